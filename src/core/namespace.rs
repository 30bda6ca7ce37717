// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Namespace stack for symbol qualification.

/// Separator joining namespace components in emitted symbol names.
pub const SEPARATOR: &str = "_";

/// Stack of namespace components for qualified symbol names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceStack {
    segments: Vec<String>,
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn enter(&mut self, name: &str) {
        self.segments.push(name.to_string());
    }

    /// Leave the innermost namespace. Returns `false` when none is open.
    pub fn leave(&mut self) -> bool {
        self.segments.pop().is_some()
    }

    /// Components joined by `_`, without a trailing separator.
    pub fn name(&self) -> String {
        self.segments.join(SEPARATOR)
    }

    /// Components joined by `_` plus a trailing `_`; empty when no namespace
    /// is open.
    pub fn prefix(&self) -> String {
        if self.segments.is_empty() {
            String::new()
        } else {
            format!("{}{SEPARATOR}", self.name())
        }
    }

    pub fn qualify(&self, name: &str) -> String {
        format!("{}{name}", self.prefix())
    }
}
