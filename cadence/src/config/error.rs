// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

/// Setup failures. Raised by [`load_config`](super::load_config) and by
/// chunking name parsing, always before a stream starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown chunking mode \"{name}\", expected \"adaptive\", \"word\", \"line\", or a pattern")]
    UnknownChunking { name: String },

    #[error("invalid regex pattern \"{pattern}\": {source}")]
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid config: {0}")]
    Validation(String),
}
