// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Raw YAML deserialization types (internal)
// Kept apart from the typed config because regexes, closures, and
// durations are built from these between parsing and use.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub chunking: Option<RawChunking>,
    pub delay_ms: Option<u64>,
    pub pacing: Option<RawPacing>,
}

/// `chunking: word` or `chunking: { pattern: "..." }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawChunking {
    Named(String),
    Pattern { pattern: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPacing {
    pub block_ms: Option<u64>,
    pub default_ms: Option<u64>,
}
