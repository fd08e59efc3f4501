//! Command-line argument definitions for the Astrolabe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the diagram to render, where and in
//! which format to write it, the configuration file and logging verbosity.

use clap::Parser;

use astrolabe::OutputFormat;

/// Command-line arguments for the Astrolabe diagram renderer
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML diagram description
    #[arg(help = "Path to the input description; the built-in diagram is rendered when omitted")]
    pub input: Option<String>,

    /// Built-in diagram to render when no input is given
    #[arg(long, default_value = "editor-service", conflicts_with = "input")]
    pub builtin: String,

    /// Path to the output file
    #[arg(short, long, default_value = "editor_service_class_diagram.png")]
    pub output: String,

    /// Output format (svg, png, dot); inferred from the output extension by default
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
