// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Text re-chunking and pacing
//
// Responsibilities:
// - Accumulate text deltas per stream in a private buffer
// - Classify the buffer (code block, table, list, link) once per delta
// - Extract complete chunks at the selected granularity, in order
// - Pause between chunks without blocking the runtime
// - Flush pending text before forwarding any non-text fragment
// - Flush the remainder at end of stream; drop it on upstream failure

mod classifier;
mod detector;
mod processor;
mod types;

pub use classifier::{ClassifierState, ContextClassifier};
pub use detector::{Chunking, DetectFn, LIST_ITEM_WIDTH};
pub use processor::{Output, SmoothStream, StreamSmoother, OUTPUT_CHANNEL_CAPACITY};
pub use types::{ChunkingMode, StreamError, StreamStats};
