//! bhasa CLI — transliteration gateway and live console.
//!
//! ```text
//! bhasa serve [--port 3000] [--host 0.0.0.0]
//! bhasa translate "kasto cha" [--unicode] [--server http://localhost:3000]
//! bhasa speak "namaste" [--server http://localhost:3000]
//! bhasa live [--unicode] [--debounce-ms 300] [--server http://localhost:3000]
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use bhasa_lib::bhasa_core::types::{GatewayConfig, Resolution, Scheme, UpstreamConfig};
use bhasa_lib::gateway::GatewayClient;
use bhasa_lib::pipeline::InputPipeline;
use bhasa_lib::playback::Speaker;
use bhasa_lib::relay::Relay;
use bhasa_lib::server;
use bhasa_lib::transport::Transport;

/// bhasa — Nepali transliteration gateway
#[derive(Parser)]
#[command(name = "bhasa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the relay server
    Serve {
        /// Listen port
        #[arg(long, default_value = "3000")]
        port: u16,
        /// Listen host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
    /// Resolve text once through a running gateway
    Translate {
        /// Romanized text to resolve
        text: String,
        /// Use the input-tools scheme instead of full translation
        #[arg(long)]
        unicode: bool,
        /// Gateway URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Speak text through the TTS relay
    Speak {
        /// Text to speak
        text: String,
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Feed stdin lines through the live input pipeline
    Live {
        /// Use the input-tools scheme instead of full translation
        #[arg(long)]
        unicode: bool,
        /// Debounce interval in milliseconds
        #[arg(long, default_value = "300")]
        debounce_ms: u64,
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

fn scheme_for(unicode: bool) -> Scheme {
    if unicode {
        Scheme::Unicode
    } else {
        Scheme::Romanized
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "bhasa=info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host } => {
            let relay = Relay::new(UpstreamConfig::default());
            let app = server::router(relay);

            let addr = format!("{host}:{port}");
            eprintln!("bhasa relay listening on {addr}");

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .expect("failed to bind");
            axum::serve(listener, app).await.expect("server error");
        }

        Command::Translate {
            text,
            unicode,
            server,
        } => {
            let client = GatewayClient::new(GatewayConfig { base_url: server });
            let cancel = CancellationToken::new();
            match client.fetch(scheme_for(unicode), &text, &cancel).await {
                Resolution::Done(result) => println!("{result}"),
                Resolution::Failed(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
                Resolution::NoResult => {
                    eprintln!("no result");
                    std::process::exit(1);
                }
                Resolution::Cancelled => {}
            }
        }

        Command::Speak { text, server } => {
            let client = GatewayClient::new(GatewayConfig { base_url: server });
            match client.fetch_audio(&text).await {
                Ok(audio) => {
                    let speaker = Speaker::new();
                    speaker.play(audio, |message| {
                        tracing::error!("playback failed: {message}");
                    });
                    speaker.wait_idle();
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }

        Command::Live {
            unicode,
            debounce_ms,
            server,
        } => {
            let client = GatewayClient::new(GatewayConfig { base_url: server });
            let pipeline = InputPipeline::new(client, scheme_for(unicode));
            let delay = Duration::from_millis(debounce_ms);

            let mut output = pipeline.subscribe();
            tokio::spawn(async move {
                while output.changed().await.is_ok() {
                    let text = output.borrow_and_update().clone();
                    println!("→ {text}");
                }
            });

            eprintln!("type romanized Nepali; an empty line clears; Ctrl-D exits");
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                pipeline.submit(&line, delay);
            }
        }
    }
}
