// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Conversion pipeline and the file boundary around it.
//!
//! `convert_source` runs tokenizer, parser and layout in memory and returns
//! either the complete output text or every diagnostic recorded. `convert_file`
//! adds reading the input and publishing the output: the text is staged in
//! `<output>.tmp` and renamed over `<output>` only after a clean run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{
    ConvError, ConvErrorKind, ConvertError, ConvertReport, Diagnostic, Diagnostics,
};
use crate::core::layout::LayoutEmitter;
use crate::core::line::tokenize;
use crate::core::parser::parse_lines;

pub const DEFAULT_INPUT: &str = "f256-microkernel-api.asm";
pub const DEFAULT_OUTPUT: &str = "f256-microkernel.s";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Structures appended after the document: `(namespace, registry key)`.
pub const KERNEL_TRAILERS: [(&str, &str); 2] = [
    ("kernel_event", "kernel_event_event_t"),
    ("kernel_time", "kernel_time_t"),
];

/// Settings for the generated prologue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub tool: String,
    pub target: String,
    pub visibility: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            target: "f256".to_string(),
            visibility: "public".to_string(),
        }
    }
}

/// Fixed header block of every generated file.
pub fn render_prologue(options: &ConvertOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "; This file is automatically converted to Accelerate syntax by {}.\n",
        options.tool
    ));
    out.push_str("; Do not edit manually.\n");
    out.push_str("; Comments describing structures lost their spot in conversion.\n");
    out.push('\n');
    out.push_str(&format!(".target \"{}\"\n", options.target));
    out.push_str(&format!(".visibility {}\n", options.visibility));
    out.push('\n');
    out
}

/// Emit the microkernel event and time structures at address 0.
pub fn emit_kernel_trailers(emitter: &mut LayoutEmitter<'_>) {
    for (namespace, key) in KERNEL_TRAILERS {
        emitter.emit_named(namespace, key, 0);
    }
}

/// Convert source text. Succeeds only when no diagnostic was recorded.
pub fn convert_source(
    source_name: &str,
    text: &str,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    let lines = tokenize(text);
    let mut diagnostics = Diagnostics::new(source_name);
    let model = parse_lines(&lines, &mut diagnostics);

    let mut emitter = LayoutEmitter::new(&model, &mut diagnostics);
    emitter.emit_document();
    emit_kernel_trailers(&mut emitter);
    let (body, symbols) = emitter.into_output();

    if diagnostics.has_errors() {
        return Err(ConvertError::from_diagnostics(diagnostics));
    }
    let mut output = render_prologue(options);
    output.push_str(&body);
    Ok(ConvertReport::new(output, lines.len(), symbols))
}

/// Read `input`, convert it and publish the result as `output`.
///
/// On failure `output` is left untouched and no temporary file remains.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    let source_name = input.to_string_lossy().to_string();
    let text = read_source(input)?;
    let report = convert_source(&source_name, &text, options)?;
    publish(output, report.output())
        .map_err(|err| io_error(&source_name, "Error writing output file", &err))?;
    Ok(report)
}

/// Read the whole input file.
pub fn read_source(input: &Path) -> Result<String, ConvertError> {
    fs::read_to_string(input)
        .map_err(|err| io_error(&input.to_string_lossy(), "Error reading input file", &err))
}

/// Path used to stage `output` before it is renamed into place.
pub fn temp_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn publish(output: &Path, text: &str) -> std::io::Result<()> {
    let temp = temp_path(output);
    let result = fs::write(&temp, text).and_then(|()| fs::rename(&temp, output));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn io_error(source_name: &str, msg: &str, err: &std::io::Error) -> ConvertError {
    let error = ConvError::new(ConvErrorKind::Io, msg, Some(&err.to_string()));
    let diag = Diagnostic::new(source_name, None, error.clone());
    ConvertError::new(error, vec![diag])
}
