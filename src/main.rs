// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for f256conv.

use std::fs::OpenOptions;
use std::io::{self, Write};

use clap::Parser;
use serde_json::json;

use f256conv::cli::{Cli, CliConfig, DiagnosticsSinkConfig, OutputFormat, validate_cli};
use f256conv::convert::{convert_file, convert_source, read_source};
use f256conv::core::error::{ConvertError, ConvertReport, Diagnostic};

struct DiagnosticsSink {
    writer: Option<Box<dyn Write>>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Disabled => Ok(Self { writer: None }),
            DiagnosticsSinkConfig::Stderr => Ok(Self {
                writer: Some(Box::new(io::stderr())),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Some(Box::new(file)),
                })
            }
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Some(writer) = &mut self.writer {
            let _ = writeln!(writer, "{line}");
        }
    }

    fn emit_diagnostics(&mut self, diagnostics: &[Diagnostic], format: OutputFormat) {
        for diag in diagnostics {
            self.emit_line(&format_diagnostic_line(diag, format));
        }
    }
}

fn format_diagnostic_line(diag: &Diagnostic, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({
            "code": diag.code(),
            "severity": "error",
            "message": diag.message(),
            "file": diag.file(),
            "line": diag.line(),
        })
        .to_string(),
        OutputFormat::Text => diag.format(),
    }
}

fn format_summary(config: &CliConfig, report: &ConvertReport) -> String {
    let verb = if config.check_only {
        "checked"
    } else {
        "wrote"
    };
    match config.output_format {
        OutputFormat::Json => json!({
            "status": "ok",
            "input": config.input_path.to_string_lossy(),
            "output": (!config.check_only).then(|| config.output_path.to_string_lossy()),
            "lines": report.source_lines(),
            "symbols": report.symbols(),
        })
        .to_string(),
        OutputFormat::Text => format!(
            "{}: {verb} {} symbols from {} lines",
            if config.check_only {
                config.input_path.display()
            } else {
                config.output_path.display()
            },
            report.symbols(),
            report.source_lines()
        ),
    }
}

fn run(config: &CliConfig) -> Result<ConvertReport, ConvertError> {
    if !config.check_only {
        return convert_file(&config.input_path, &config.output_path, &config.options);
    }
    let text = read_source(&config.input_path)?;
    let source_name = config.input_path.to_string_lossy();
    convert_source(&source_name, &text, &config.options)
}

fn main() {
    let cli = Cli::parse();
    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&cli_config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(1);
        }
    };

    match run(&cli_config) {
        Ok(report) => {
            if !cli_config.quiet {
                println!("{}", format_summary(&cli_config, &report));
            }
        }
        Err(err) => {
            sink.emit_diagnostics(err.diagnostics(), cli_config.output_format);
            if cli_config.output_format != OutputFormat::Json
                && !matches!(cli_config.diagnostics_sink, DiagnosticsSinkConfig::Disabled)
            {
                sink.emit_line(&err.to_string());
            }
            std::process::exit(1);
        }
    }
}
