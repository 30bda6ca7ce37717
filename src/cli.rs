// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::convert::{ConvertOptions, DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::core::error::{ConvError, ConvErrorKind, ConvertError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str =
    "Converts the F256 microkernel API include file into Accelerate symbol definitions.

Structures, unions and virtual regions are laid out and every member is emitted
as `name = $offset`. The output file is only replaced when the whole input
converts without a single diagnostic.
Environment variables F256CONV_OUTPUT, F256CONV_TARGET, F256CONV_VISIBILITY,
F256CONV_ERROR_FILE, F256CONV_ERROR_APPEND, F256CONV_NO_ERROR and F256CONV_QUIET
supply defaults; command-line options take precedence.";

#[derive(Parser, Debug)]
#[command(
    name = "f256conv",
    version = VERSION,
    about = "Convert the F256 microkernel API header to Accelerate syntax",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "INPUT",
        long_help = "Microkernel API source to convert. Defaults to f256-microkernel-api.asm."
    )]
    pub input: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "FILE",
        long_help = "Output file. Defaults to f256-microkernel.s. The file is staged as FILE.tmp and renamed into place on success."
    )]
    pub outfile: Option<PathBuf>,
    #[arg(
        long = "target",
        value_name = "NAME",
        long_help = "Target name written to the .target line. Defaults to f256."
    )]
    pub target: Option<String>,
    #[arg(
        long = "visibility",
        value_name = "VIS",
        long_help = "Visibility written to the .visibility line. Defaults to public."
    )]
    pub visibility: Option<String>,
    #[arg(
        long = "check",
        action = ArgAction::SetTrue,
        long_help = "Convert and report diagnostics without writing the output file."
    )]
    pub check: bool,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Diagnostic format. text prints `file:line: message`; json prints one object per diagnostic."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the summary line for successful runs. Errors are still reported unless --no-error is set."
    )]
    pub quiet: bool,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stderr."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
    #[arg(
        long = "no-error",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["error_file", "error_append"],
        long_help = "Disable all diagnostic output routing."
    )]
    pub no_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsSinkConfig {
    Stderr,
    File { path: PathBuf, append: bool },
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub options: ConvertOptions,
    pub check_only: bool,
    pub quiet: bool,
    pub output_format: OutputFormat,
    pub diagnostics_sink: DiagnosticsSinkConfig,
}

fn cli_error(message: impl Into<String>) -> ConvertError {
    ConvertError::new(
        ConvError::new(ConvErrorKind::Cli, &message.into(), None),
        Vec::new(),
    )
}

fn parse_env_bool(var_name: &str) -> Result<Option<bool>, ConvertError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_ascii_lowercase();
    let parsed = match value.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        "" => None,
        _ => {
            return Err(cli_error(format!(
                "Invalid boolean value for {var_name}: {value}"
            )));
        }
    };
    Ok(parsed)
}

fn parse_env_path(var_name: &str) -> Result<Option<PathBuf>, ConvertError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(value)))
}

fn parse_env_string(var_name: &str) -> Result<Option<String>, ConvertError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(value))
}

fn validate_word(value: String, what: &str) -> Result<String, ConvertError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        return Err(cli_error(format!("Invalid {what}: {value:?}")));
    }
    Ok(value)
}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, ConvertError> {
    let env_output = parse_env_path("F256CONV_OUTPUT")?;
    let env_target = parse_env_string("F256CONV_TARGET")?;
    let env_visibility = parse_env_string("F256CONV_VISIBILITY")?;

    let env_quiet = parse_env_bool("F256CONV_QUIET")?;
    let env_error_file = parse_env_path("F256CONV_ERROR_FILE")?;
    let env_error_append = parse_env_bool("F256CONV_ERROR_APPEND")?;
    let env_no_error = parse_env_bool("F256CONV_NO_ERROR")?;

    let input_path = cli
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output_path = cli
        .outfile
        .clone()
        .or(env_output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    if input_path == output_path {
        return Err(cli_error("Output file must differ from the input file"));
    }

    let defaults = ConvertOptions::default();
    let target = validate_word(
        cli.target.clone().or(env_target).unwrap_or(defaults.target),
        "target",
    )?;
    let visibility = validate_word(
        cli.visibility
            .clone()
            .or(env_visibility)
            .unwrap_or(defaults.visibility),
        "visibility",
    )?;

    let effective_quiet = if cli.quiet {
        true
    } else {
        env_quiet.unwrap_or(false)
    };

    let effective_error_file = if cli.error_file.is_some() {
        cli.error_file.clone()
    } else {
        env_error_file
    };

    let effective_error_append = if cli.error_append {
        true
    } else {
        env_error_append.unwrap_or(false)
    };

    let effective_no_error = if cli.no_error {
        true
    } else if cli.error_file.is_some() {
        false
    } else {
        env_no_error.unwrap_or(false)
    };

    Ok(CliConfig {
        input_path,
        output_path,
        options: ConvertOptions {
            tool: defaults.tool,
            target,
            visibility,
        },
        check_only: cli.check,
        quiet: effective_quiet,
        output_format: cli.format,
        diagnostics_sink: if effective_no_error {
            DiagnosticsSinkConfig::Disabled
        } else if let Some(path) = &effective_error_file {
            DiagnosticsSinkConfig::File {
                path: path.clone(),
                append: effective_error_append,
            }
        } else {
            DiagnosticsSinkConfig::Stderr
        },
    })
}
