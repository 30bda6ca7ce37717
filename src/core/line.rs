// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line tokenizer for the directive language.

/// Comment-start character of the microkernel API header.
pub const COMMENT_CHAR: char = ';';

/// One source line split into words and an optional trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    words: Vec<String>,
    comment: Option<String>,
}

impl Line {
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, COMMENT_CHAR)
    }

    pub fn parse_with(raw: &str, comment_char: char) -> Self {
        let text = raw.trim_end().to_string();
        let (code, comment) = match text.find(comment_char) {
            Some(0) => ("", Some(text.clone())),
            Some(pos) => (&text[..pos], Some(text[pos..].to_string())),
            None => (text.as_str(), None),
        };
        let words = code.split_whitespace().map(str::to_string).collect();
        Self {
            words,
            comment,
            text,
        }
    }

    /// The raw line with trailing whitespace removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Tokenize a whole source text, one `Line` per input line.
pub fn tokenize(source: &str) -> Vec<Line> {
    source.lines().map(Line::parse).collect()
}
