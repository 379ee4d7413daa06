// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use cadence::config::{self, ConfigSource, FileSource, StringSource};
use cadence::{ChunkingOption, DelayPolicy, Fragment, SmoothStream};

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

#[derive(Parser)]
#[command(name = "cadence", about = "Re-chunk and pace text read from stdin")]
struct Cli {
    /// Path to a cadence.yaml config file
    #[arg(long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Chunking override: adaptive, word, or line
    #[arg(long)]
    chunking: Option<String>,

    /// Flat delay override in milliseconds (0 disables pacing)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Bytes requested per stdin read
    #[arg(long, default_value_t = 64)]
    read_size: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source: Box<dyn ConfigSource> = match &cli.config {
        Some(path) => Box::new(FileSource::new(path.clone())),
        None => Box::new(StringSource::default()),
    };
    let mut smoothing = match config::load_config(source.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if let Some(name) = &cli.chunking {
        smoothing.chunking = match name.parse::<ChunkingOption>() {
            Ok(option) => option,
            Err(e) => {
                tracing::error!("invalid --chunking: {e}");
                std::process::exit(1);
            }
        };
    }
    if let Some(ms) = cli.delay_ms {
        smoothing.delay = match ms {
            0 => DelayPolicy::None,
            ms => DelayPolicy::Fixed(Duration::from_millis(ms)),
        };
    }

    tracing::info!(
        chunking = ?smoothing.chunking,
        delay = ?smoothing.delay,
        "config loaded"
    );

    let mut output = SmoothStream::new(smoothing).try_process(stdin_fragments(cli.read_size));
    let mut stdout = tokio::io::stdout();

    while let Some(item) = output.next().await {
        match item {
            Ok(Fragment::Text { delta }) => {
                let written = async {
                    stdout.write_all(delta.as_bytes()).await?;
                    stdout.flush().await
                };
                if let Err(e) = written.await {
                    tracing::error!("failed to write output: {e}");
                    std::process::exit(1);
                }
            }
            Ok(Fragment::Other { payload: () }) => {}
            Err(e) => {
                tracing::error!("stream failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Read stdin in fixed-size pieces and relay each as a text fragment.
fn stdin_fragments(read_size: usize) -> ReceiverStream<std::io::Result<Fragment<()>>> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = vec![0u8; read_size.max(1)];
        let mut pending = Vec::new();

        loop {
            match stdin.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    pending.extend_from_slice(&buf[..n]);
                    let text = take_utf8(&mut pending);
                    if !text.is_empty() && tx.send(Ok(Fragment::text(text))).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }

        if !pending.is_empty() {
            let tail = String::from_utf8_lossy(&pending).into_owned();
            let _ = tx.send(Ok(Fragment::text(tail))).await;
        }
    });

    ReceiverStream::new(rx)
}

/// Drain the decodable prefix of `pending`, keeping an incomplete trailing
/// code point for the next read. Invalid sequences are replaced.
fn take_utf8(pending: &mut Vec<u8>) -> String {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            text
        }
        Err(e) if e.error_len().is_none() => {
            let valid = e.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            text
        }
        Err(_) => {
            let text = String::from_utf8_lossy(pending).into_owned();
            pending.clear();
            text
        }
    }
}
