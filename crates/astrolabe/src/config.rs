//! Configuration types for Astrolabe diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled and rendered. All types implement
//! [`serde::Deserialize`] and every field has a default, so a configuration
//! file only needs to list the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Layout engine selection and spacing.
//! - [`StyleConfig`] - Colors, fonts and line styles.
//! - [`RenderConfig`] - Rendering backend and PNG scale.
//!
//! # Example
//!
//! ```
//! # use astrolabe::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r##"
//!     [layout]
//!     engine = "basic"
//!
//!     [style]
//!     edge_color = "#0000ff"
//!     "##,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().engine().to_string(), "basic");
//! assert!(config.validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use astrolabe_core::{
    color::Color,
    draw::{ArrowStyle, StrokeStyle},
};

use crate::{error::AstrolabeError, layout::LayoutEngine};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, render: RenderConfig) -> Self {
        Self {
            layout,
            style,
            render,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Checks every value that deserialization alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::Config`] naming the first invalid value:
    /// an unparsable color, a non-positive font size or scale, or a negative
    /// spacing.
    pub fn validate(&self) -> Result<(), AstrolabeError> {
        self.layout.validate()?;
        self.style.validate()?;
        self.render.validate()
    }
}

/// Layout engine and spacing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    engine: LayoutEngine,
    horizontal_spacing: f32,
    vertical_spacing: f32,
    /// Margin around the whole drawing.
    padding: f32,
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    fn validate(&self) -> Result<(), AstrolabeError> {
        for (name, value) in [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("padding", self.padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AstrolabeError::Config(format!(
                    "layout.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
            padding: 35.0,
        }
    }
}

/// Visual styling of rendered diagrams.
///
/// Colors are kept as the strings found in the configuration and parsed on
/// access, so a bad value is reported with the key it came from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    node_fill_color: Option<String>,
    node_stroke_color: String,
    /// Rounding of node box corners, 0 for square corners.
    node_corner_radius: f32,
    edge_color: String,
    /// `straight`, `curved` or `orthogonal`.
    edge_style: String,
    /// `solid`, `dashed`, `dotted` or a raw SVG dash array such as `"8,3"`.
    edge_line: String,
    font_family: String,
    font_size: u16,
    edge_font_size: u16,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` for a transparent background.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, AstrolabeError> {
        parse_optional_color("background_color", self.background_color.as_deref())
    }

    /// Returns the parsed node fill [`Color`], or `None` for unfilled boxes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn node_fill_color(&self) -> Result<Option<Color>, AstrolabeError> {
        parse_optional_color("node_fill_color", self.node_fill_color.as_deref())
    }

    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn node_stroke_color(&self) -> Result<Color, AstrolabeError> {
        parse_color("node_stroke_color", &self.node_stroke_color)
    }

    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Color, AstrolabeError> {
        parse_color("edge_color", &self.edge_color)
    }

    /// # Errors
    ///
    /// Returns an error for anything but `straight`, `curved` or `orthogonal`.
    pub fn edge_style(&self) -> Result<ArrowStyle, AstrolabeError> {
        self.edge_style
            .parse()
            .map_err(|err| AstrolabeError::Config(format!("style.edge_style: {err}")))
    }

    /// # Errors
    ///
    /// Returns an error for an empty value.
    pub fn edge_line(&self) -> Result<StrokeStyle, AstrolabeError> {
        self.edge_line
            .trim()
            .parse()
            .map_err(|err| AstrolabeError::Config(format!("style.edge_line: {err}")))
    }

    pub fn node_corner_radius(&self) -> f32 {
        self.node_corner_radius
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn edge_font_size(&self) -> u16 {
        self.edge_font_size
    }

    pub fn with_background_color(mut self, color: Option<&str>) -> Self {
        self.background_color = color.map(str::to_string);
        self
    }

    pub fn with_node_fill_color(mut self, color: Option<&str>) -> Self {
        self.node_fill_color = color.map(str::to_string);
        self
    }

    pub fn with_edge_color(mut self, color: &str) -> Self {
        self.edge_color = color.to_string();
        self
    }

    pub fn with_edge_line(mut self, line: &str) -> Self {
        self.edge_line = line.to_string();
        self
    }

    pub fn with_node_corner_radius(mut self, radius: f32) -> Self {
        self.node_corner_radius = radius;
        self
    }

    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    fn validate(&self) -> Result<(), AstrolabeError> {
        self.background_color()?;
        self.node_fill_color()?;
        self.node_stroke_color()?;
        self.edge_color()?;
        self.edge_style()?;
        self.edge_line()?;
        if !self.node_corner_radius.is_finite() || self.node_corner_radius < 0.0 {
            return Err(AstrolabeError::Config(format!(
                "style.node_corner_radius must be a non-negative number, got {}",
                self.node_corner_radius
            )));
        }
        if self.font_size == 0 || self.edge_font_size == 0 {
            return Err(AstrolabeError::Config(
                "style.font_size and style.edge_font_size must be positive".to_string(),
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(AstrolabeError::Config(
                "style.font_family must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: Some("white".to_string()),
            node_fill_color: Some("#fdf6e3".to_string()),
            node_stroke_color: "black".to_string(),
            node_corner_radius: 0.0,
            edge_color: "#333333".to_string(),
            edge_style: "straight".to_string(),
            edge_line: "solid".to_string(),
            font_family: "Arial".to_string(),
            font_size: 14,
            edge_font_size: 12,
        }
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, AstrolabeError> {
    Color::new(value).map_err(|err| AstrolabeError::Config(format!("style.{key}: {err}")))
}

fn parse_optional_color(key: &str, value: Option<&str>) -> Result<Option<Color>, AstrolabeError> {
    value.map(|value| parse_color(key, value)).transpose()
}

/// Which component turns a laid-out diagram into image bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process layout, SVG generation and `resvg` rasterization.
    #[default]
    Native,
    /// The Graphviz `dot` executable. Requires the `graphviz` cargo feature.
    Graphviz,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "graphviz" => Ok(Self::Graphviz),
            _ => Err(format!(
                "unsupported backend `{s}`, valid values: native, graphviz"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Graphviz => write!(f, "graphviz"),
        }
    }
}

/// Backend selection and rasterization settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    backend: Backend,
    /// PNG rasterization scale.
    scale: f32,
}

impl RenderConfig {
    pub fn new(backend: Backend, scale: f32) -> Self {
        Self { backend, scale }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn validate(&self) -> Result<(), AstrolabeError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(AstrolabeError::Config(format!(
                "render.scale must be greater than zero, got {}",
                self.scale
            )))
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(Backend::Native, 1.0)
    }
}
