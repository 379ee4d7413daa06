// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Stream processor
//
// Takes an upstream fragment stream, buffers text deltas, re-chunks them at
// the granularity the context classifier selects, paces each chunk, and
// forwards non-text fragments after flushing whatever text is pending.

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::Instrument;

use super::classifier::{ClassifierState, ContextClassifier};
use super::detector::Chunking;
use super::types::{ChunkingMode, StreamError, StreamStats};
use crate::config::{ChunkingOption, SmoothingConfig};
use crate::fragment::Fragment;
use crate::pacing::{PacingController, Sleeper, TokioSleeper};

/// Capacity of the channel between the processing task and the consumer.
pub const OUTPUT_CHANNEL_CAPACITY: usize = 64;

/// One item of smoothed output.
pub type Output<P> = Result<Fragment<P>, StreamError>;

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Per-stream state
// ---------------------------------------------------------------------------

/// Buffer, classifier flags, and pacing for exactly one stream.
///
/// Nothing in here is shared; concurrent streams each build their own.
#[derive(Debug)]
pub struct StreamSmoother {
    buffer: String,
    classifier: ContextClassifier,
    chunking: ChunkingOption,
    pacing: PacingController,
    mode: ChunkingMode,
    stats: StreamStats,
}

impl StreamSmoother {
    /// Create a smoother that paces with the real tokio timer.
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            buffer: String::new(),
            classifier: ContextClassifier::new(),
            chunking: config.chunking,
            pacing: PacingController::new(config.delay, Arc::new(TokioSleeper)),
            mode: ChunkingMode::default(),
            stats: StreamStats::default(),
        }
    }

    /// Replace the delay primitive.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.pacing.set_sleeper(sleeper);
        self
    }

    /// Text received but not yet emitted.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Mode the classifier resolved on the last text fragment.
    pub fn mode(&self) -> ChunkingMode {
        self.mode
    }

    pub fn state(&self) -> ClassifierState {
        self.classifier.state()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Handle one upstream fragment, sending everything it releases to `tx`.
    ///
    /// Text is appended, classified once against the whole buffer, then
    /// drained chunk by chunk with a pacing pause after each. A non-text
    /// fragment first flushes pending text, then goes out unchanged.
    ///
    /// Returns `StreamError::Closed` if the receiver went away, or a
    /// contract violation from a custom detector. Either way the caller
    /// should stop feeding this smoother.
    pub async fn push<P>(
        &mut self,
        fragment: Fragment<P>,
        tx: &mpsc::Sender<Output<P>>,
    ) -> Result<(), StreamError> {
        let delta = match fragment {
            Fragment::Text { delta } => delta,
            other @ Fragment::Other { .. } => {
                if let Some(rest) = self.flush() {
                    send(tx, Fragment::text(rest)).await?;
                }
                send(tx, other).await?;
                self.stats.passthrough += 1;
                return Ok(());
            }
        };

        self.buffer.push_str(&delta);

        let mode = self.classifier.observe(&self.buffer);
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "chunking mode changed");
            self.mode = mode;
        }
        let state = self.classifier.state();

        let builtin;
        let detector = match &self.chunking {
            ChunkingOption::Adaptive => {
                builtin = Chunking::from(mode);
                &builtin
            }
            ChunkingOption::Fixed(chunking) => chunking,
        };

        loop {
            let len = match detector.detect(&self.buffer)? {
                Some(chunk) => chunk.len(),
                None => break,
            };
            let rest = self.buffer.split_off(len);
            let chunk = std::mem::replace(&mut self.buffer, rest);

            tracing::trace!(mode = %mode, len = chunk.len(), "emitting chunk");
            self.stats.chunks += 1;
            self.stats.text_bytes += chunk.len() as u64;
            send(tx, Fragment::text(chunk)).await?;

            tokio::select! {
                _ = self.pacing.pause(&state, &self.buffer) => {}
                _ = tx.closed() => return Err(StreamError::Closed),
            }
        }

        Ok(())
    }

    /// Take everything still buffered as one final chunk.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        self.stats.chunks += 1;
        self.stats.flushes += 1;
        self.stats.text_bytes += rest.len() as u64;
        Some(rest)
    }

    /// Flush the remainder to `tx` at the end of the stream.
    pub async fn close<P>(&mut self, tx: &mpsc::Sender<Output<P>>) -> Result<(), StreamError> {
        if let Some(rest) = self.flush() {
            send(tx, Fragment::text(rest)).await?;
        }
        let stats = self.stats;
        tracing::debug!(
            chunks = stats.chunks,
            text_bytes = stats.text_bytes,
            flushes = stats.flushes,
            passthrough = stats.passthrough,
            "stream closed"
        );
        Ok(())
    }
}

async fn send<P>(tx: &mpsc::Sender<Output<P>>, fragment: Fragment<P>) -> Result<(), StreamError> {
    tx.send(Ok(fragment)).await.map_err(|_| StreamError::Closed)
}

// ---------------------------------------------------------------------------
// Stream driver
// ---------------------------------------------------------------------------

/// Builds a fresh [`StreamSmoother`] per input stream and drives it on its
/// own task.
#[derive(Clone)]
pub struct SmoothStream {
    config: SmoothingConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl SmoothStream {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the delay primitive for every stream this driver starts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Smooth an infallible fragment stream.
    pub fn process<P>(
        &self,
        input: impl Stream<Item = Fragment<P>> + Unpin + Send + 'static,
    ) -> impl Stream<Item = Output<P>> + Unpin + Send
    where
        P: Send + 'static,
    {
        self.try_process(input.map(Ok::<_, Infallible>))
    }

    /// Smooth a fallible fragment stream.
    ///
    /// At the end of the input the remaining buffer is flushed. An upstream
    /// error is forwarded as `StreamError::Upstream` and ends the stream
    /// with buffered text discarded. A contract violation is forwarded the
    /// same way. If the consumer drops the output, processing stops.
    pub fn try_process<P, E>(
        &self,
        mut input: impl Stream<Item = Result<Fragment<P>, E>> + Unpin + Send + 'static,
    ) -> impl Stream<Item = Output<P>> + Unpin + Send
    where
        P: Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
    {
        let mut smoother =
            StreamSmoother::new(self.config.clone()).with_sleeper(self.sleeper.clone());
        let (tx, rx) = mpsc::channel::<Output<P>>(OUTPUT_CHANNEL_CAPACITY);

        let stream_id = NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed);
        let span = tracing::debug_span!("smooth_stream", stream_id);

        tokio::spawn(
            async move {
                while let Some(item) = input.next().await {
                    let fragment = match item {
                        Ok(fragment) => fragment,
                        Err(e) => {
                            let err = StreamError::Upstream(e.into());
                            tracing::warn!(
                                error = %err,
                                discarded = smoother.buffered().len(),
                                "upstream failed, dropping buffered text"
                            );
                            let _ = tx.send(Err(err)).await;
                            return;
                        }
                    };

                    match smoother.push(fragment, &tx).await {
                        Ok(()) => {}
                        Err(StreamError::Closed) => {
                            tracing::debug!("downstream closed, stopping");
                            return;
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "chunk detector contract violation");
                            let _ = tx.send(Err(err)).await;
                            return;
                        }
                    }
                }

                if smoother.close(&tx).await.is_err() {
                    tracing::debug!("downstream closed before final flush");
                }
            }
            .instrument(span),
        );

        ReceiverStream::new(rx)
    }
}

impl fmt::Debug for SmoothStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoothStream")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
