// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use regex::Regex;

use super::error::ConfigError;
use super::raw;
use super::source::ConfigSource;
use super::types::*;
use crate::pacing::{DelayPolicy, BLOCK_DELAY, PROSE_DELAY};
use crate::stream::Chunking;

/// Load and validate a smoothing config from the given source.
///
/// Steps:
/// 1. Read raw YAML from source (an empty document means all defaults)
/// 2. Parse into raw deserialization types
/// 3. Resolve the chunking option, compiling a pattern if one is given
/// 4. Resolve the delay policy, rejecting `delay_ms` together with `pacing`
pub fn load_config(source: &dyn ConfigSource) -> Result<SmoothingConfig, ConfigError> {
    let raw_yaml = source.load()?;

    let raw: raw::RawConfig = if raw_yaml.trim().is_empty() {
        raw::RawConfig::default()
    } else {
        serde_yaml::from_str(&raw_yaml)?
    };

    let chunking = build_chunking(raw.chunking)?;
    let delay = build_delay(raw.delay_ms, raw.pacing)?;
    tracing::debug!(source = %source.describe(), ?chunking, ?delay, "smoothing config resolved");

    Ok(SmoothingConfig { chunking, delay })
}

fn build_chunking(raw: Option<raw::RawChunking>) -> Result<ChunkingOption, ConfigError> {
    match raw {
        None => Ok(ChunkingOption::Adaptive),
        Some(raw::RawChunking::Named(name)) => name.parse(),
        Some(raw::RawChunking::Pattern { pattern }) => {
            let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidRegex {
                pattern: pattern.clone(),
                source: e,
            })?;
            Ok(ChunkingOption::Fixed(Chunking::Pattern(regex)))
        }
    }
}

fn build_delay(
    delay_ms: Option<u64>,
    pacing: Option<raw::RawPacing>,
) -> Result<DelayPolicy, ConfigError> {
    match (delay_ms, pacing) {
        (Some(_), Some(_)) => Err(ConfigError::Validation(
            "\"delay_ms\" and \"pacing\" are mutually exclusive".to_string(),
        )),
        (Some(0), None) => Ok(DelayPolicy::None),
        (Some(ms), None) => Ok(DelayPolicy::Fixed(Duration::from_millis(ms))),
        (None, Some(pacing)) => Ok(DelayPolicy::ContentAware {
            block: pacing.block_ms.map(Duration::from_millis).unwrap_or(BLOCK_DELAY),
            default: pacing.default_ms.map(Duration::from_millis).unwrap_or(PROSE_DELAY),
        }),
        (None, None) => Ok(DelayPolicy::default()),
    }
}
