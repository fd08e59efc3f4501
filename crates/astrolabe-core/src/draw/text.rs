//! Text measurement and rendering for node and edge labels.
//!
//! - [`TextDefinition`] - reusable font and color settings
//! - [`Text`] - a label bound to a definition; measurable and drawable
//!
//! Labels may contain `\n`; every line becomes its own `<tspan>`.
//!
//! ```
//! # use astrolabe_core::draw::{Text, TextDefinition};
//! let mut style = TextDefinition::new();
//! style.set_font_size(14);
//!
//! let text = Text::new(&style, "EditorController\n+handleRequest(req, res)");
//! assert_eq!(text.line_count(), 2);
//! assert!(text.calculate_size().width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
};

/// Points to pixels at 96 DPI.
const PT_TO_PX: f32 = 1.33;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Average advance of a sans-serif glyph relative to the font size, used
/// when no font could shape the text.
const FALLBACK_ADVANCE: f32 = 0.55;

/// Font and color settings shared by many labels.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial"` |
/// | Font size | `14` |
/// | Text color | `None` (SVG default, black) |
/// | Background color | `None` |
/// | Padding | zero |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
    background_color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// A background makes the label readable where it crosses an edge path.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 14,
            color: None,
            background_color: None,
            padding: Insets::default(),
        }
    }
}

/// A label ready to be measured or drawn.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Size of the text including the definition's padding.
    pub fn calculate_size(&self) -> Size {
        self.calculate_size_without_padding()
            .add_padding(self.definition.padding())
    }

    fn calculate_size_without_padding(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.content.is_empty() {
            return output;
        }

        let lines: Vec<&str> = self.content.lines().collect();
        let content_size = self.calculate_size_without_padding();
        let line_height = content_size.height() / lines.len().max(1) as f32;

        // The first `dy` moves onto line one, so start half a block plus one line above center.
        let start_y = position.y() - (content_size.height() + line_height) / 2.0;

        let mut text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", start_y)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            text = text
                .set("fill", color.to_hex())
                .set("fill-opacity", color.alpha());
        }

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            text = text.add(tspan);
        }

        if let Some(background) = self.definition.background_color() {
            let bounds = position.to_bounds(self.calculate_size());
            let rect = svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", background.to_hex())
                .set("fill-opacity", background.alpha())
                .set("rx", 3.0);
            output.add_to_layer(RenderLayer::Text, Box::new(rect));
        }

        output.add_to_layer(RenderLayer::Text, Box::new(text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Owns the shared [`FontSystem`]; building one scans system fonts, so it is
/// created once per process.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` by shaping it with cosmic-text.
    ///
    /// Lines that no installed font can shape are estimated from the
    /// character count, so measurement never yields a zero-width label.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size_px = f32::from(text_def.font_size()) * PT_TO_PX;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        buffer.set_size(None, None);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let measured_width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .fold(0.0_f32, f32::max);

        let line_count = text.lines().count().max(1);
        let height = line_count as f32 * metrics.line_height;

        let width = if measured_width > 0.0 {
            measured_width
        } else {
            debug!(text; "No glyphs shaped, estimating text width");
            text.lines()
                .map(|line| line.chars().count() as f32 * font_size_px * FALLBACK_ADVANCE)
                .fold(0.0_f32, f32::max)
        };

        Size::new(width, height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
