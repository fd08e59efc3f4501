//! Drawing definitions resolved from a [`StyleConfig`].
//!
//! Every exporter draws from the same [`Theme`], so node boxes measured for
//! layout are exactly the boxes that get drawn.

use astrolabe_core::{
    color::Color,
    draw::{ArrowDefinition, Drawable, NodeBox, NodeBoxDefinition, StrokeDefinition, TextDefinition},
    geometry::{Insets, Size},
};

use crate::{config::StyleConfig, error::AstrolabeError};

#[derive(Debug, Clone, Default)]
pub struct Theme {
    background: Option<Color>,
    node: NodeBoxDefinition,
    arrow: ArrowDefinition,
    edge_text: TextDefinition,
}

impl Theme {
    /// Resolves every color and font setting of `style`.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::Config`] for an invalid color, edge style or
    /// edge line.
    pub fn from_style(style: &StyleConfig) -> Result<Self, AstrolabeError> {
        let mut node_text = TextDefinition::new();
        node_text.set_font_family(style.font_family());
        node_text.set_font_size(style.font_size());

        let mut node = NodeBoxDefinition::new();
        node.set_fill_color(style.node_fill_color()?);
        node.set_stroke(StrokeDefinition::solid(style.node_stroke_color()?, 1.5));
        node.set_corner_radius(style.node_corner_radius());
        node.set_text(node_text);

        let edge_color = style.edge_color()?;
        let mut edge_stroke = StrokeDefinition::solid(edge_color, 1.2);
        edge_stroke.set_style(style.edge_line()?);
        let mut arrow = ArrowDefinition::new(edge_stroke);
        arrow.set_style(style.edge_style()?);

        // Edge labels get a translucent backing so they stay legible over lines.
        let background = style.background_color()?;
        let mut edge_text = TextDefinition::new();
        edge_text.set_font_family(style.font_family());
        edge_text.set_font_size(style.edge_font_size());
        edge_text.set_color(Some(edge_color));
        edge_text.set_background_color(Some(
            background
                .unwrap_or_else(|| Color::new("white").unwrap_or_default())
                .with_alpha(0.85),
        ));
        edge_text.set_padding(Insets::new(1.0, 3.0, 1.0, 3.0));

        Ok(Self {
            background,
            node,
            arrow,
            edge_text,
        })
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn node(&self) -> &NodeBoxDefinition {
        &self.node
    }

    pub fn arrow(&self) -> &ArrowDefinition {
        &self.arrow
    }

    pub fn edge_text(&self) -> &TextDefinition {
        &self.edge_text
    }

    pub fn font_family(&self) -> &str {
        self.node.text().font_family()
    }

    /// Size of the box drawn for a node with this label.
    pub fn node_size(&self, label: &str) -> Size {
        NodeBox::new(&self.node, label).size()
    }
}
