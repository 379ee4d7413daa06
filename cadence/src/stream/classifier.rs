// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

// Context classifier
//
// Cheap substring heuristics over the pending buffer that track whether the
// stream is inside a fenced code block, a table, a list item, or a link.
// This is not a Markdown parser and it misfires on prose that happens to
// contain the markers (a hyphenated word flips the list flag, the word
// "http" flips the link flag). The flags only steer chunk granularity and
// pacing, so a misfire costs cadence, never content.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ChunkingMode;

/// Opening fence: three backticks followed by a language token.
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\w+").expect("fence open regex is valid"));

/// Closing fence: three backticks alone on a line. Indentation and a CRLF
/// line ending are allowed; a language token is not.
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*```[ \t\r]*$").expect("fence close regex is valid"));

const LINK_MARKERS: &[&str] = &["http"];
const LIST_MARKERS: &[&str] = &["*", "-"];
const TABLE_MARKERS: &[&str] = &["|"];

// ---------------------------------------------------------------------------
// Classifier state
// ---------------------------------------------------------------------------

/// Context flags for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub in_code_block: bool,
    pub in_table: bool,
    pub in_list: bool,
    pub in_link: bool,
}

impl ClassifierState {
    /// Granularity implied by the flags.
    ///
    /// Code block, table, and link all force whole lines; an open list item
    /// uses the fixed window; everything else goes word by word.
    pub fn mode(&self) -> ChunkingMode {
        if self.in_code_block || self.in_table || self.in_link {
            ChunkingMode::Line
        } else if self.in_list {
            ChunkingMode::ListItem
        } else {
            ChunkingMode::Word
        }
    }

    /// True inside content that is paced slower: fenced code and tables.
    pub fn in_block(&self) -> bool {
        self.in_code_block || self.in_table
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Re-evaluates [`ClassifierState`] against the whole pending buffer.
///
/// Owned by exactly one stream. Call [`observe`](Self::observe) once per
/// incoming text fragment, after the delta has been appended.
#[derive(Debug, Default)]
pub struct ContextClassifier {
    state: ClassifierState,
}

impl ContextClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Update all four flags from `buffer` and return the resolved mode.
    pub fn observe(&mut self, buffer: &str) -> ChunkingMode {
        self.state.in_code_block = code_block_flag(self.state.in_code_block, buffer);
        self.state.in_link = line_scoped_flag(self.state.in_link, buffer, LINK_MARKERS, "\n");
        self.state.in_list = line_scoped_flag(self.state.in_list, buffer, LIST_MARKERS, "\n");
        self.state.in_table = line_scoped_flag(self.state.in_table, buffer, TABLE_MARKERS, "\n\n");
        self.state.mode()
    }
}

/// Set on an opening fence with a language token, cleared by a bare
/// closing fence line after it.
fn code_block_flag(current: bool, buffer: &str) -> bool {
    if current {
        return !FENCE_CLOSE.is_match(buffer);
    }
    match FENCE_OPEN.find(buffer) {
        Some(open) => !FENCE_CLOSE.is_match(&buffer[open.end()..]),
        None => false,
    }
}

/// Set when a marker appears with no terminator after it; once set, cleared
/// by a terminator that is not followed by a fresh marker. With neither in
/// the buffer the flag keeps its value.
fn line_scoped_flag(current: bool, buffer: &str, markers: &[&str], terminator: &str) -> bool {
    let last_marker = markers.iter().filter_map(|m| buffer.rfind(m)).max();
    let last_terminator = buffer.rfind(terminator);

    match (last_marker, last_terminator) {
        (Some(_), None) => true,
        (Some(marker), Some(term)) if marker > term => true,
        (_, Some(_)) => false,
        (None, None) => current,
    }
}
