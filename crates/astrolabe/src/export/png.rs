//! PNG output by rasterizing the SVG rendering with `resvg`.

use log::{debug, info};
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg,
};

use astrolabe_core::diagram::Diagram;

use crate::export::{self, Exporter, svg::Svg};

/// Rasterizes the output of an [`Svg`] exporter.
pub struct Png<'a> {
    svg: Svg<'a>,
    scale: f32,
    font_family: &'a str,
}

impl<'a> Png<'a> {
    /// `font_family` is used for text whose requested family is not installed.
    pub fn new(svg: Svg<'a>, scale: f32, font_family: &'a str) -> Self {
        Self {
            svg,
            scale,
            font_family,
        }
    }
}

impl Exporter for Png<'_> {
    fn export(&self, diagram: &Diagram) -> Result<Vec<u8>, export::Error> {
        let svg = self.svg.render_document(diagram).to_string();
        rasterize(&svg, self.scale, self.font_family)
    }
}

/// Renders an SVG document to PNG bytes at `scale`.
///
/// System fonts are loaded for text; without any installed fonts labels are
/// simply left out of the image.
///
/// # Errors
///
/// Returns [`export::Error::Rasterize`] if the scale is not positive, the
/// document cannot be parsed, or the scaled image is empty or too large.
pub fn rasterize(svg: &str, scale: f32, font_family: &str) -> Result<Vec<u8>, export::Error> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(export::Error::Rasterize(format!(
            "scale must be greater than zero, got {scale}"
        )));
    }

    let mut options = usvg::Options::default();
    options.font_family = font_family.to_string();
    options.fontdb_mut().load_system_fonts();
    debug!(fonts = options.fontdb.len(); "Font database loaded");

    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| {
        export::Error::Rasterize(format!("failed to parse generated SVG: {err}"))
    })?;

    let size = tree.size();
    let width = (size.width() * scale).ceil();
    let height = (size.height() * scale).ceil();
    if !(width >= 1.0 && height >= 1.0 && width <= u32::MAX as f32 && height <= u32::MAX as f32) {
        return Err(export::Error::Rasterize(format!(
            "cannot rasterize a {width}x{height} image"
        )));
    }

    let (width, height) = (width as u32, height as u32);
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        export::Error::Rasterize(format!("failed to allocate a {width}x{height} surface"))
    })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let bytes = pixmap
        .encode_png()
        .map_err(|err| export::Error::Rasterize(format!("failed to encode PNG: {err}")))?;
    info!(width = width, height = height, scale = scale; "PNG rasterized");
    Ok(bytes)
}
