// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Chunk detectors
//
// A detector looks at the pending buffer and answers with the prefix that
// forms the next complete chunk, or nothing if the buffer does not hold a
// complete chunk yet. Built-in granularities can never break that contract;
// caller-supplied ones are checked on every call.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::types::{ChunkingMode, StreamError};
use crate::config::ConfigError;

/// Width of a list-item window, in characters.
pub const LIST_ITEM_WIDTH: usize = 8;

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+\s+").expect("word boundary regex is valid"));

static LINE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("line boundary regex is valid"));

/// Caller-supplied detector. Must return a non-empty prefix of its argument.
pub type DetectFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

/// A chunk granularity.
#[derive(Clone)]
pub enum Chunking {
    /// Up to the end of the first non-whitespace run and the whitespace after it.
    Word,
    /// Up to the end of the first run of newlines.
    Line,
    /// A fixed [`LIST_ITEM_WIDTH`]-character window.
    ListItem,
    /// Up to the end of the first match of a caller regex.
    Pattern(Regex),
    /// A caller function.
    Custom(DetectFn),
}

impl Chunking {
    /// Wrap a closure as a custom detector.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Chunking::Custom(Arc::new(f))
    }

    /// Find the next complete chunk at the front of `buffer`.
    ///
    /// On success the returned slice is a non-empty prefix of `buffer`.
    /// A `Pattern` that matches the empty string at the start, or a
    /// `Custom` function that returns an empty or non-prefix string, is a
    /// contract violation.
    pub fn detect<'b>(&self, buffer: &'b str) -> Result<Option<&'b str>, StreamError> {
        match self {
            Chunking::Word => Ok(through_first_match(&WORD_BOUNDARY, buffer)),
            Chunking::Line => Ok(through_first_match(&LINE_BOUNDARY, buffer)),
            Chunking::ListItem => Ok(fixed_window(buffer, LIST_ITEM_WIDTH)),
            Chunking::Pattern(regex) => match through_first_match(regex, buffer) {
                Some("") => Err(StreamError::EmptyMatch {
                    buffer: buffer.to_string(),
                }),
                other => Ok(other),
            },
            Chunking::Custom(f) => {
                let Some(matched) = f(buffer) else {
                    return Ok(None);
                };
                if matched.is_empty() {
                    return Err(StreamError::EmptyMatch {
                        buffer: buffer.to_string(),
                    });
                }
                if !buffer.starts_with(matched.as_str()) {
                    return Err(StreamError::NotAPrefix {
                        matched,
                        buffer: buffer.to_string(),
                    });
                }
                Ok(Some(&buffer[..matched.len()]))
            }
        }
    }
}

impl From<ChunkingMode> for Chunking {
    fn from(mode: ChunkingMode) -> Self {
        match mode {
            ChunkingMode::Word => Chunking::Word,
            ChunkingMode::Line => Chunking::Line,
            ChunkingMode::ListItem => Chunking::ListItem,
        }
    }
}

/// Caller override names. The list-item window is only selected by the
/// classifier while a list item is open, so it has no name here.
impl FromStr for Chunking {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Chunking::Word),
            "line" => Ok(Chunking::Line),
            other => Err(ConfigError::UnknownChunking {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Chunking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunking::Word => f.write_str("Word"),
            Chunking::Line => f.write_str("Line"),
            Chunking::ListItem => f.write_str("ListItem"),
            Chunking::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Chunking::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything before the first match plus the match itself.
fn through_first_match<'b>(regex: &Regex, buffer: &'b str) -> Option<&'b str> {
    regex.find(buffer).map(|m| &buffer[..m.end()])
}

/// The first `width` characters, once the buffer holds that many.
fn fixed_window(buffer: &str, width: usize) -> Option<&str> {
    match buffer.char_indices().nth(width) {
        Some((end, _)) => Some(&buffer[..end]),
        None if buffer.chars().count() == width => Some(buffer),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_takes_word_and_trailing_whitespace() {
        assert_eq!(Chunking::Word.detect("hello world ").unwrap(), Some("hello "));
        assert_eq!(Chunking::Word.detect("hello  \n\tnext").unwrap(), Some("hello  \n\t"));
    }

    #[test]
    fn word_keeps_leading_whitespace_with_the_word() {
        assert_eq!(Chunking::Word.detect("  hi there").unwrap(), Some("  hi "));
    }

    #[test]
    fn word_waits_for_trailing_whitespace() {
        assert_eq!(Chunking::Word.detect("hello").unwrap(), None);
        assert_eq!(Chunking::Word.detect("   ").unwrap(), None);
        assert_eq!(Chunking::Word.detect("").unwrap(), None);
    }

    #[test]
    fn line_collapses_consecutive_newlines() {
        assert_eq!(Chunking::Line.detect("first\n\n\nsecond").unwrap(), Some("first\n\n\n"));
        assert_eq!(Chunking::Line.detect("no newline yet").unwrap(), None);
    }

    #[test]
    fn list_item_is_a_fixed_window() {
        assert_eq!(Chunking::ListItem.detect("- apples and pears").unwrap(), Some("- apples"));
        assert_eq!(Chunking::ListItem.detect("12345678").unwrap(), Some("12345678"));
        assert_eq!(Chunking::ListItem.detect("1234567").unwrap(), None);
    }

    #[test]
    fn list_item_counts_characters_not_bytes() {
        let buffer = "- ñandú y más";
        let chunk = Chunking::ListItem.detect(buffer).unwrap().unwrap();
        assert_eq!(chunk.chars().count(), LIST_ITEM_WIDTH);
        assert_eq!(chunk, "- ñandú ");
    }

    #[test]
    fn pattern_includes_text_before_the_match() {
        let chunking = Chunking::Pattern(Regex::new(r"[.!?]\s*").unwrap());
        assert_eq!(chunking.detect("One. Two").unwrap(), Some("One. "));
        assert_eq!(chunking.detect("no stop").unwrap(), None);
    }

    #[test]
    fn pattern_matching_empty_at_start_is_rejected() {
        let chunking = Chunking::Pattern(Regex::new(r"x*").unwrap());
        let err = chunking.detect("abc").unwrap_err();
        assert!(matches!(err, StreamError::EmptyMatch { .. }));
    }

    #[test]
    fn custom_prefix_is_accepted() {
        let chunking = Chunking::custom(|buf| buf.get(..2).map(str::to_string));
        assert_eq!(chunking.detect("abcd").unwrap(), Some("ab"));
        assert_eq!(chunking.detect("a").unwrap(), None);
    }

    #[test]
    fn custom_non_prefix_is_a_contract_violation() {
        let chunking = Chunking::custom(|_| Some("zzz".to_string()));
        let err = chunking.detect("abc").unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("not a prefix"));
    }

    #[test]
    fn custom_empty_is_a_contract_violation() {
        let chunking = Chunking::custom(|_| Some(String::new()));
        assert!(matches!(
            chunking.detect("abc"),
            Err(StreamError::EmptyMatch { .. })
        ));
    }

    #[test]
    fn parses_builtin_names() {
        assert!(matches!("word".parse::<Chunking>(), Ok(Chunking::Word)));
        assert!(matches!("line".parse::<Chunking>(), Ok(Chunking::Line)));
        for name in ["sentence", "list_item"] {
            assert!(matches!(
                name.parse::<Chunking>(),
                Err(ConfigError::UnknownChunking { .. })
            ));
        }
    }
}
