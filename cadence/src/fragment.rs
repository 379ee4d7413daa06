// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Fragment model shared by the upstream source, the smoother, and the
// downstream writer.

use serde::{Deserialize, Serialize};

/// One unit of a generated stream.
///
/// Text fragments carry a delta that the smoother re-chunks. Everything
/// else (tool calls, finish signals, provider metadata) is an opaque
/// `Other` payload that is forwarded untouched and never inspected.
///
/// Serialized with a `kind` tag:
/// `{"kind":"text","delta":"Hello"}` / `{"kind":"other","payload":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment<P> {
    /// A text delta. On the output side, one emitted chunk.
    Text { delta: String },
    /// An opaque non-text event.
    Other { payload: P },
}

impl<P> Fragment<P> {
    pub fn text(delta: impl Into<String>) -> Self {
        Fragment::Text {
            delta: delta.into(),
        }
    }

    pub fn other(payload: P) -> Self {
        Fragment::Other { payload }
    }

    /// The text delta, if this is a text fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Text { delta } => Some(delta),
            Fragment::Other { .. } => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Fragment::Text { .. })
    }
}
