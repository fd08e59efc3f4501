//! Astrolabe - declare directed, labeled diagrams and render them to images.
//!
//! A [`Diagram`] is built in code (or parsed from a TOML
//! [description](description)), laid out with a layered graph layout, and
//! written to one SVG, PNG or DOT file. Graphviz can optionally take over
//! layout and rasterization (cargo feature `graphviz`).
//!
//! ```rust,no_run
//! use astrolabe::{Diagram, OutputFormat};
//!
//! let mut diagram = Diagram::new("Example");
//! diagram.add_node("A", "Alpha")?;
//! diagram.add_node("B", "Beta")?;
//! diagram.add_edge("A", "B", "uses")?;
//!
//! astrolabe::render(&diagram, "out.png", OutputFormat::Png)?;
//! # Ok::<(), astrolabe::AstrolabeError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod description;
pub mod export;
pub mod layout;
pub mod theme;

mod error;
mod format;

pub use astrolabe_core::{color, diagram, draw, geometry, identifier};

pub use astrolabe_core::diagram::{Diagram, DiagramError};
pub use error::AstrolabeError;
pub use format::OutputFormat;

use std::path::Path;

use log::{debug, info, trace};

use config::{AppConfig, Backend};
use export::{Exporter, dot::DotExporter, png::Png, svg::Svg};
use layout::{EngineBuilder, Layout};
use theme::Theme;

/// Lays out and renders diagrams with one configuration.
///
/// Rendering borrows the diagram, so the same diagram can be rendered any
/// number of times, to different paths and formats.
///
/// # Examples
///
/// ```rust,no_run
/// use astrolabe::{OutputFormat, Renderer, catalog, config::AppConfig};
///
/// let diagram = catalog::editor_service()?;
/// let renderer = Renderer::new(AppConfig::default());
///
/// // Into memory
/// let svg = renderer.render_svg(&diagram)?;
/// assert!(svg.starts_with("<svg"));
///
/// // Or straight to a file
/// renderer.render(&diagram, "editor_service_class_diagram.png", OutputFormat::Png)?;
/// # Ok::<(), astrolabe::AstrolabeError>(())
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    config: AppConfig,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// The configuration is validated on every render, so an invalid value
    /// is reported by the first call that uses it.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn theme(&self) -> Result<Theme, AstrolabeError> {
        self.config.validate()?;
        Theme::from_style(self.config.style())
    }

    fn layout_with_theme(
        &self,
        diagram: &Diagram,
        theme: &Theme,
    ) -> Result<Layout, AstrolabeError> {
        let layout_config = self.config.layout();
        let sizes = diagram
            .nodes()
            .map(|node| theme.node_size(node.label()))
            .collect();

        EngineBuilder::new(layout_config.engine())
            .with_horizontal_spacing(layout_config.horizontal_spacing())
            .with_vertical_spacing(layout_config.vertical_spacing())
            .with_padding(layout_config.padding())
            .build(diagram, sizes)
    }

    /// Layout step of a render. Layout failures are part of rendering there,
    /// so they surface as [`AstrolabeError::Render`].
    fn layout_for_render(
        &self,
        diagram: &Diagram,
        theme: &Theme,
    ) -> Result<Layout, AstrolabeError> {
        self.layout_with_theme(diagram, theme)
            .map_err(layout_failure_as_render_error)
    }

    /// Computes node positions with the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError` for invalid configuration or layout failures.
    pub fn layout(&self, diagram: &Diagram) -> Result<Layout, AstrolabeError> {
        let theme = self.theme()?;
        self.layout_with_theme(diagram, &theme)
    }

    /// Renders `diagram` to an SVG string with the native backend.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Config` for invalid configuration and
    /// `AstrolabeError::Render` for layout failures.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, AstrolabeError> {
        let theme = self.theme()?;
        let layout = self.layout_for_render(diagram, &theme)?;
        Ok(Svg::new(&theme, &layout).render_document(diagram).to_string())
    }

    /// Renders `diagram` as Graphviz DOT source.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Config` for invalid configuration.
    pub fn render_dot(&self, diagram: &Diagram) -> Result<String, AstrolabeError> {
        let theme = self.theme()?;
        Ok(export::dot::Dot::new(diagram, &theme).to_string())
    }

    /// Produces the complete contents of an output file in memory.
    ///
    /// DOT output is always written directly. SVG and PNG go through the
    /// configured [`Backend`].
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Config` for invalid configuration and
    /// `AstrolabeError::Render` when layout, rasterization or the Graphviz
    /// backend fails.
    pub fn render_to_bytes(
        &self,
        diagram: &Diagram,
        format: OutputFormat,
    ) -> Result<Vec<u8>, AstrolabeError> {
        let theme = self.theme()?;
        let backend = self.config.render().backend();
        info!(
            diagram = diagram.name(),
            format:% = format,
            backend:% = backend;
            "Rendering diagram"
        );

        let bytes = match (format, backend) {
            (OutputFormat::Dot, _) => DotExporter::new(&theme).export(diagram)?,
            (_, Backend::Native) => {
                let layout = self.layout_for_render(diagram, &theme)?;
                trace!(layout:? = layout; "Layout");
                let svg = Svg::new(&theme, &layout);
                if format == OutputFormat::Png {
                    Png::new(svg, self.config.render().scale(), theme.font_family())
                        .export(diagram)?
                } else {
                    svg.export(diagram)?
                }
            }
            (_, Backend::Graphviz) => Self::render_with_graphviz(diagram, &theme, format)?,
        };

        debug!(bytes = bytes.len(); "Diagram rendered");
        Ok(bytes)
    }

    #[cfg(feature = "graphviz")]
    fn render_with_graphviz(
        diagram: &Diagram,
        theme: &Theme,
        format: OutputFormat,
    ) -> Result<Vec<u8>, AstrolabeError> {
        Ok(export::graphviz::Graphviz::new(theme, format)?.export(diagram)?)
    }

    #[cfg(not(feature = "graphviz"))]
    fn render_with_graphviz(
        _diagram: &Diagram,
        _theme: &Theme,
        _format: OutputFormat,
    ) -> Result<Vec<u8>, AstrolabeError> {
        Err(export::Error::Render(
            "the graphviz backend requires astrolabe to be built with the `graphviz` feature"
                .to_string(),
        )
        .into())
    }

    /// Lays out `diagram`, serializes it to `format` and writes exactly one
    /// file at `path`.
    ///
    /// The file is written atomically: on any error nothing is created and
    /// an existing file at `path` is left untouched. The diagram is not
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Render` if the output cannot be produced or
    /// written, including when the parent directory of `path` does not
    /// exist.
    pub fn render(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<(), AstrolabeError> {
        let bytes = self.render_to_bytes(diagram, format)?;
        export::write_atomically(path.as_ref(), &bytes)?;
        Ok(())
    }
}

fn layout_failure_as_render_error(err: AstrolabeError) -> AstrolabeError {
    match err {
        AstrolabeError::Layout(message) => export::Error::Layout(message).into(),
        other => other,
    }
}

/// Renders `diagram` to `path` with the default configuration.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(
    diagram: &Diagram,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), AstrolabeError> {
    Renderer::default().render(diagram, path, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_failure_is_render_error() {
        let err = layout_failure_as_render_error(AstrolabeError::Layout(
            "rust-sugiyama layout engine panicked: boom".to_string(),
        ));

        match err {
            AstrolabeError::Render(export::Error::Layout(message)) => {
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = layout_failure_as_render_error(AstrolabeError::Config("bad".to_string()));
        assert!(matches!(err, AstrolabeError::Config(_)));
    }
}
