// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Pacing controller
//
// Decides how long to wait after each emitted chunk and performs the wait
// through an injectable sleeper, so tests can run without wall-clock time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{self, BoxFuture};

use crate::stream::ClassifierState;

/// Default flat delay between chunks.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

/// Content-aware delay inside fenced code and tables.
pub const BLOCK_DELAY: Duration = Duration::from_millis(100);

/// Content-aware delay everywhere else.
pub const PROSE_DELAY: Duration = Duration::from_millis(30);

/// Delay computed from the text still buffered after a chunk is removed.
pub type DelayFn = Arc<dyn Fn(&str) -> Duration + Send + Sync>;

// ---------------------------------------------------------------------------
// Delay policy
// ---------------------------------------------------------------------------

/// How long to pause between emitted chunks.
#[derive(Clone)]
pub enum DelayPolicy {
    /// Emit back to back without suspending.
    None,
    /// The same delay after every chunk.
    Fixed(Duration),
    /// `block` while inside a code block or table, `default` otherwise.
    ContentAware { block: Duration, default: Duration },
    /// A caller function of the remaining buffer.
    PerBuffer(DelayFn),
}

impl DelayPolicy {
    /// Slower pacing for fenced and tabular content so it does not flash past.
    pub fn content_aware() -> Self {
        DelayPolicy::ContentAware {
            block: BLOCK_DELAY,
            default: PROSE_DELAY,
        }
    }

    pub fn per_buffer<F>(f: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        DelayPolicy::PerBuffer(Arc::new(f))
    }

    /// Delay after a chunk, given the context flags and what is left buffered.
    /// `None` means do not suspend at all.
    pub fn delay_for(&self, state: &ClassifierState, remaining: &str) -> Option<Duration> {
        match self {
            DelayPolicy::None => None,
            DelayPolicy::Fixed(d) => Some(*d),
            DelayPolicy::ContentAware { block, default } => {
                Some(if state.in_block() { *block } else { *default })
            }
            DelayPolicy::PerBuffer(f) => Some(f(remaining)),
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Fixed(DEFAULT_DELAY)
    }
}

impl fmt::Debug for DelayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayPolicy::None => f.write_str("None"),
            DelayPolicy::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            DelayPolicy::ContentAware { block, default } => f
                .debug_struct("ContentAware")
                .field("block", block)
                .field("default", default)
                .finish(),
            DelayPolicy::PerBuffer(_) => f.write_str("PerBuffer(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sleeper
// ---------------------------------------------------------------------------

/// The suspension primitive behind pacing.
///
/// Implementations must yield to the scheduler rather than block a worker
/// thread.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Real timer backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Completes immediately. For deterministic tests and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(future::ready(()))
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Combines a [`DelayPolicy`] with the [`Sleeper`] that carries it out.
#[derive(Clone)]
pub struct PacingController {
    policy: DelayPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl PacingController {
    pub fn new(policy: DelayPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &DelayPolicy {
        &self.policy
    }

    pub fn set_sleeper(&mut self, sleeper: Arc<dyn Sleeper>) {
        self.sleeper = sleeper;
    }

    /// Suspend for whatever the policy asks after a chunk.
    pub async fn pause(&self, state: &ClassifierState, remaining: &str) {
        if let Some(delay) = self.policy.delay_for(state, remaining) {
            if !delay.is_zero() {
                self.sleeper.sleep(delay).await;
            }
        }
    }
}

impl fmt::Debug for PacingController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacingController")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
