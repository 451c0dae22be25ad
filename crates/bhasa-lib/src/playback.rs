//! Fire-and-forget playback of relayed TTS clips.
//!
//! rodio's `OutputStream` is `!Send`, so the sink lives on a dedicated OS
//! thread fed over a channel. Every failure path invokes the caller's
//! error hook; playback problems never propagate past it.

use std::io::Cursor;
use std::sync::mpsc;

use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

/// Required failure callback, invoked with a human-readable message on
/// any decode or device problem.
pub type ErrorHook = Box<dyn FnOnce(String) + Send>;

enum PlayCmd {
    Play { audio: Vec<u8>, on_error: ErrorHook },
    Stop,
    WaitIdle(mpsc::Sender<()>),
}

/// Cloneable handle to the playback thread. All methods are non-blocking
/// except [`Speaker::wait_idle`].
#[derive(Clone)]
pub struct Speaker {
    cmd_tx: mpsc::Sender<PlayCmd>,
}

impl Speaker {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<PlayCmd>();
        std::thread::Builder::new()
            .name("bhasa-playback".into())
            .spawn(move || playback_thread(cmd_rx))
            .expect("failed to spawn playback thread");
        Self { cmd_tx }
    }

    /// Queue an mpeg clip. `on_error` fires (possibly on the playback
    /// thread) if the clip cannot be decoded or the device is gone.
    pub fn play(&self, audio: Vec<u8>, on_error: impl FnOnce(String) + Send + 'static) {
        let cmd = PlayCmd::Play {
            audio,
            on_error: Box::new(on_error),
        };
        if let Err(mpsc::SendError(cmd)) = self.cmd_tx.send(cmd) {
            if let PlayCmd::Play { on_error, .. } = cmd {
                on_error("playback thread is gone".to_string());
            }
        }
    }

    /// Stop the current clip and drop everything queued.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(PlayCmd::Stop);
    }

    /// Block until every queued clip has finished playing.
    pub fn wait_idle(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.cmd_tx.send(PlayCmd::WaitIdle(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

fn playback_thread(cmd_rx: mpsc::Receiver<PlayCmd>) {
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            // No audio device: keep draining commands so hooks still fire.
            let reason = format!("failed to open audio output: {e}");
            for cmd in cmd_rx {
                match cmd {
                    PlayCmd::Play { on_error, .. } => on_error(reason.clone()),
                    PlayCmd::Stop => {}
                    PlayCmd::WaitIdle(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            return;
        }
    };

    let mut sink = Sink::try_new(&stream_handle).ok();

    for cmd in cmd_rx {
        match cmd {
            PlayCmd::Play { audio, on_error } => {
                let Some(sink) = sink.as_ref() else {
                    on_error("audio sink unavailable".to_string());
                    continue;
                };
                match Decoder::new(Cursor::new(audio)) {
                    Ok(source) => {
                        debug!("playback: clip appended to sink");
                        sink.append(source);
                    }
                    Err(e) => on_error(format!("could not decode audio: {e}")),
                }
            }
            PlayCmd::Stop => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                sink = Sink::try_new(&stream_handle).ok();
            }
            PlayCmd::WaitIdle(ack) => {
                if let Some(sink) = sink.as_ref() {
                    sink.sleep_until_end();
                }
                let _ = ack.send(());
            }
        }
    }
}
