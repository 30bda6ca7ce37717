// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and the diagnostic collector shared by the
//! parse and layout passes.

use std::fmt;

/// Categories of converter errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvErrorKind {
    Cli,
    Directive,
    Io,
    Layout,
    Number,
    Scope,
    Symbol,
}

/// A converter error with a kind and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvError {
    kind: ConvErrorKind,
    message: String,
}

impl ConvError {
    pub fn new(kind: ConvErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ConvErrorKind {
        self.kind
    }
}

impl fmt::Display for ConvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConvError {}

/// A diagnostic tied to a source file and, when known, a 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) line: Option<u32>,
    pub(crate) code: String,
    pub(crate) error: ConvError,
    pub(crate) file: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: Option<u32>, error: ConvError) -> Self {
        Self {
            line,
            code: default_diagnostic_code(error.kind()).to_string(),
            error,
            file: file.into(),
        }
    }

    /// `<file>:<line>: <message>`, or `<file>: <message>` without a line.
    pub fn format(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}: {}", self.file, line, self.error.message()),
            None => format!("{}: {}", self.file, self.error.message()),
        }
    }

    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn kind(&self) -> ConvErrorKind {
        self.error.kind()
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Collects diagnostics for one source file. The run has failed exactly when
/// `has_errors` is true.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    source: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    pub fn error(&mut self, line: Option<u32>, kind: ConvErrorKind, message: impl Into<String>) {
        let message: String = message.into();
        let error = ConvError::new(kind, &message, None);
        self.entries.push(Diagnostic::new(self.source.clone(), line, error));
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    output: String,
    source_lines: usize,
    symbols: usize,
}

impl ConvertReport {
    pub fn new(output: String, source_lines: usize, symbols: usize) -> Self {
        Self {
            output,
            source_lines,
            symbols,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn source_lines(&self) -> usize {
        self.source_lines
    }

    pub fn symbols(&self) -> usize {
        self.symbols
    }
}

/// A failed conversion: the summary error plus every diagnostic recorded.
#[derive(Debug, Clone)]
pub struct ConvertError {
    error: ConvError,
    diagnostics: Vec<Diagnostic>,
}

impl ConvertError {
    pub fn new(error: ConvError, diagnostics: Vec<Diagnostic>) -> Self {
        Self { error, diagnostics }
    }

    pub fn from_diagnostics(diagnostics: Diagnostics) -> Self {
        let count = diagnostics.len();
        let error = ConvError::new(
            ConvErrorKind::Directive,
            &format!("Conversion failed with {count} error(s)"),
            None,
        );
        Self::new(error, diagnostics.into_entries())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn kind(&self) -> ConvErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ConvertError {}

fn default_diagnostic_code(kind: ConvErrorKind) -> &'static str {
    match kind {
        ConvErrorKind::Cli => "cnv101",
        ConvErrorKind::Directive => "cnv201",
        ConvErrorKind::Scope => "cnv202",
        ConvErrorKind::Number => "cnv203",
        ConvErrorKind::Layout => "cnv301",
        ConvErrorKind::Symbol => "cnv302",
        ConvErrorKind::Io => "cnv501",
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}
