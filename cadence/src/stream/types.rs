// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Stream types
//
// Chunking granularity, per-stream counters, and the errors that end a
// stream.

use std::fmt;

// ---------------------------------------------------------------------------
// Chunking granularity
// ---------------------------------------------------------------------------

/// Built-in granularity selected by the context classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChunkingMode {
    /// A word plus its trailing whitespace.
    #[default]
    Word,
    /// Everything up to and including a run of newlines.
    Line,
    /// Fixed-width window, used while a list item is open.
    ListItem,
}

impl fmt::Display for ChunkingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChunkingMode::Word => "word",
            ChunkingMode::Line => "line",
            ChunkingMode::ListItem => "list_item",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Per-stream counters, reported when the stream closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Text chunks emitted, flushes included.
    pub chunks: u64,
    /// Bytes of text emitted.
    pub text_bytes: u64,
    /// Flushes that emitted a non-empty remainder.
    pub flushes: u64,
    /// Non-text fragments forwarded.
    pub passthrough: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that end a smoothed stream.
///
/// None of these are retried. A contract violation is a caller bug in a
/// custom detector; an upstream failure belongs to the fragment source.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("chunk detector returned an empty match (buffer: {buffer:?})")]
    EmptyMatch { buffer: String },

    #[error("chunk detector returned {matched:?}, which is not a prefix of buffer {buffer:?}")]
    NotAPrefix { matched: String, buffer: String },

    #[error("upstream fragment source failed: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("downstream consumer closed")]
    Closed,
}

impl StreamError {
    /// True for the two detector contract violations.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            StreamError::EmptyMatch { .. } | StreamError::NotAPrefix { .. }
        )
    }
}
