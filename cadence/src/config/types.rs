// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use super::error::ConfigError;
use crate::pacing::DelayPolicy;
use crate::stream::Chunking;

/// Which detector the smoother uses.
#[derive(Debug, Clone, Default)]
pub enum ChunkingOption {
    /// Let the context classifier pick word, line, or list-item chunks.
    #[default]
    Adaptive,
    /// Always use this detector. The classifier still runs for pacing.
    Fixed(Chunking),
}

impl From<Chunking> for ChunkingOption {
    fn from(chunking: Chunking) -> Self {
        ChunkingOption::Fixed(chunking)
    }
}

impl FromStr for ChunkingOption {
    type Err = ConfigError;

    /// `adaptive`, or any built-in detector name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "adaptive" => Ok(ChunkingOption::Adaptive),
            other => Ok(ChunkingOption::Fixed(other.parse()?)),
        }
    }
}

/// Typed configuration for one smoothing pipeline.
///
/// Shared by every stream the pipeline starts; per-stream state lives in
/// the smoother, never here.
#[derive(Debug, Clone, Default)]
pub struct SmoothingConfig {
    /// Granularity override, or adaptive.
    pub chunking: ChunkingOption,
    /// Pause after each emitted chunk.
    pub delay: DelayPolicy,
}

impl SmoothingConfig {
    pub fn new(chunking: impl Into<ChunkingOption>, delay: DelayPolicy) -> Self {
        Self {
            chunking: chunking.into(),
            delay,
        }
    }

    /// Adaptive chunking with the slower code/table pacing used by
    /// interactive chat responses.
    pub fn content_aware() -> Self {
        Self {
            chunking: ChunkingOption::Adaptive,
            delay: DelayPolicy::content_aware(),
        }
    }
}
