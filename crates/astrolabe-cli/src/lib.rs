//! CLI logic for the Astrolabe diagram renderer.
//!
//! This module reads a diagram (a TOML description or a built-in catalog
//! entry), renders it with the discovered configuration and writes the
//! output file.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use astrolabe::{AstrolabeError, Diagram, OutputFormat, Renderer, catalog, description};

/// Run the Astrolabe CLI application
///
/// # Errors
///
/// Returns `AstrolabeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Description parsing and diagram construction errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), AstrolabeError> {
    info!(
        input_path:? = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let format = output_format(args)?;
    let diagram = load_diagram(args)?;

    Renderer::new(app_config).render(&diagram, &args.output, format)?;

    info!(output_file = args.output, format:% = format; "Diagram exported successfully");

    Ok(())
}

fn load_diagram(args: &Args) -> Result<Diagram, AstrolabeError> {
    match &args.input {
        Some(input) => {
            let source = fs::read_to_string(input)?;
            description::parse(&source)
        }
        None => {
            info!(name = args.builtin; "Using built-in diagram");
            let diagram = catalog::by_name(&args.builtin).ok_or_else(|| {
                AstrolabeError::Config(format!(
                    "unknown built-in diagram `{}`, available: {}",
                    args.builtin,
                    catalog::NAMES.join(", ")
                ))
            })??;
            Ok(diagram)
        }
    }
}

fn output_format(args: &Args) -> Result<OutputFormat, AstrolabeError> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    OutputFormat::from_path(&args.output).ok_or_else(|| {
        AstrolabeError::Config(format!(
            "cannot infer the output format of `{}`; pass --format svg, png or dot",
            args.output
        ))
    })
}
