// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use super::error::ConfigError;

/// Where a smoothing config document is read from.
pub trait ConfigSource {
    /// The raw YAML text. An empty string is a valid, all-default document.
    fn load(&self) -> Result<String, ConfigError>;

    /// Short label for log lines.
    fn describe(&self) -> String;
}

/// A YAML file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory document, for tests and for callers that embed config.
#[derive(Debug, Clone, Default)]
pub struct StringSource {
    pub content: String,
}

impl From<&str> for StringSource {
    fn from(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

impl ConfigSource for StringSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(self.content.clone())
    }

    fn describe(&self) -> String {
        "<inline>".to_string()
    }
}
