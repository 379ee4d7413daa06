// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

//! Incremental re-chunking and pacing for streamed generative text.
//!
//! Raw text deltas arrive in arbitrary sizes. [`stream::SmoothStream`]
//! buffers them per stream, picks a granularity from cheap context cues
//! (code fences, tables, lists, links), releases complete chunks in order
//! with a pause between each, and forwards non-text fragments untouched
//! after flushing pending text.

pub mod config;
pub mod fragment;
pub mod pacing;
pub mod stream;

pub use config::{load_config, ChunkingOption, ConfigError, SmoothingConfig};
pub use fragment::Fragment;
pub use pacing::{DelayPolicy, InstantSleeper, Sleeper, TokioSleeper};
pub use stream::{Chunking, ChunkingMode, SmoothStream, StreamError, StreamSmoother};
