// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Smoothing config loader and validator
//
// Loads a cadence YAML document, resolves the chunking option and delay
// policy, and fails fast on anything it cannot resolve.

mod error;
mod loader;
mod raw;
mod source;
mod types;

pub use error::ConfigError;
pub use loader::load_config;
pub use source::{ConfigSource, FileSource, StringSource};
pub use types::{ChunkingOption, SmoothingConfig};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::{DelayPolicy, BLOCK_DELAY, DEFAULT_DELAY, PROSE_DELAY};
    use crate::stream::Chunking;
    use std::time::Duration;

    fn make_source(yaml: &str) -> StringSource {
        StringSource::from(yaml)
    }

    // ---------------------------------------------------------------
    // Defaults
    // ---------------------------------------------------------------

    #[test]
    fn empty_document_uses_defaults() {
        let config = load_config(&make_source("")).unwrap();
        assert!(matches!(config.chunking, ChunkingOption::Adaptive));
        assert!(matches!(config.delay, DelayPolicy::Fixed(d) if d == DEFAULT_DELAY));
    }

    #[test]
    fn explicit_adaptive_is_accepted() {
        let config = load_config(&make_source("chunking: adaptive\n")).unwrap();
        assert!(matches!(config.chunking, ChunkingOption::Adaptive));
    }

    // ---------------------------------------------------------------
    // Chunking
    // ---------------------------------------------------------------

    #[test]
    fn named_chunking_parsed() {
        let config = load_config(&make_source("chunking: line\n")).unwrap();
        assert!(matches!(
            config.chunking,
            ChunkingOption::Fixed(Chunking::Line)
        ));

        let config = load_config(&make_source("chunking: word\n")).unwrap();
        assert!(matches!(
            config.chunking,
            ChunkingOption::Fixed(Chunking::Word)
        ));
    }

    #[test]
    fn pattern_chunking_compiles_regex() {
        let yaml = r#"
chunking:
  pattern: "[.!?]\\s+"
"#;
        let config = load_config(&make_source(yaml)).unwrap();
        match config.chunking {
            ChunkingOption::Fixed(Chunking::Pattern(regex)) => {
                assert!(regex.is_match("Done. Next"));
            }
            other => panic!("expected pattern chunking, got {other:?}"),
        }
    }

    #[test]
    fn unknown_chunking_name_fails_fast() {
        let err = load_config(&make_source("chunking: paragraph\n")).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ConfigError::UnknownChunking { .. }));
        assert!(msg.contains("paragraph"), "error should name the mode: {msg}");
    }

    #[test]
    fn list_item_is_not_a_caller_override() {
        let err = load_config(&make_source("chunking: list_item\n")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChunking { ref name } if name == "list_item"));
    }

    #[test]
    fn invalid_pattern_fails_at_load_time() {
        let yaml = "chunking:\n  pattern: \"[unterminated\"\n";
        let err = load_config(&make_source(yaml)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid regex"), "error should mention invalid regex: {msg}");
    }

    // ---------------------------------------------------------------
    // Delay
    // ---------------------------------------------------------------

    #[test]
    fn delay_ms_becomes_fixed_policy() {
        let config = load_config(&make_source("delay_ms: 25\n")).unwrap();
        assert!(matches!(
            config.delay,
            DelayPolicy::Fixed(d) if d == Duration::from_millis(25)
        ));
    }

    #[test]
    fn zero_delay_disables_pacing() {
        let config = load_config(&make_source("delay_ms: 0\n")).unwrap();
        assert!(matches!(config.delay, DelayPolicy::None));
    }

    #[test]
    fn pacing_section_defaults_missing_values() {
        let config = load_config(&make_source("pacing:\n  block_ms: 250\n")).unwrap();
        match config.delay {
            DelayPolicy::ContentAware { block, default } => {
                assert_eq!(block, Duration::from_millis(250));
                assert_eq!(default, PROSE_DELAY);
            }
            other => panic!("expected content-aware pacing, got {other:?}"),
        }

        let config = load_config(&make_source("pacing: {}\n")).unwrap();
        assert!(matches!(
            config.delay,
            DelayPolicy::ContentAware { block, .. } if block == BLOCK_DELAY
        ));
    }

    #[test]
    fn delay_ms_and_pacing_are_mutually_exclusive() {
        let yaml = "delay_ms: 10\npacing:\n  block_ms: 100\n";
        let err = load_config(&make_source(yaml)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let err = load_config(&make_source("chunkng: word\n")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let source = FileSource::new("/nonexistent/cadence.yaml");
        assert!(matches!(load_config(&source), Err(ConfigError::Io(_))));
    }
}
