//! The rectangle drawn for a diagram node.
//!
//! A [`NodeBox`] sizes itself around its label. With compartments enabled a
//! multi-line label is drawn class-diagram style: the first line is the
//! title, and a rule separates it from the remaining lines.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Bounds, Insets, Point, Size},
};

/// Visual settings shared by every node box of a diagram.
#[derive(Debug, Clone)]
pub struct NodeBoxDefinition {
    fill_color: Option<Color>,
    stroke: StrokeDefinition,
    corner_radius: f32,
    padding: Insets,
    min_width: f32,
    compartments: bool,
    text: TextDefinition,
}

impl NodeBoxDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) {
        self.fill_color = color;
    }

    pub fn set_stroke(&mut self, stroke: StrokeDefinition) {
        self.stroke = stroke;
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }

    /// Space between the label and the box outline.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn set_min_width(&mut self, width: f32) {
        self.min_width = width;
    }

    /// Draws a rule under the first label line when the label has several lines.
    pub fn set_compartments(&mut self, enabled: bool) {
        self.compartments = enabled;
    }

    pub fn set_text(&mut self, text: TextDefinition) {
        self.text = text;
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }
}

impl Default for NodeBoxDefinition {
    fn default() -> Self {
        Self {
            fill_color: Color::new("white").ok(),
            stroke: StrokeDefinition::default(),
            corner_radius: 0.0,
            padding: Insets::new(8.0, 12.0, 8.0, 12.0),
            min_width: 80.0,
            compartments: true,
            text: TextDefinition::default(),
        }
    }
}

/// A node's rectangle together with its label.
#[derive(Debug, Clone)]
pub struct NodeBox<'a> {
    definition: &'a NodeBoxDefinition,
    text: Text<'a>,
}

impl<'a> NodeBox<'a> {
    pub fn new(definition: &'a NodeBoxDefinition, label: &'a str) -> Self {
        Self {
            definition,
            text: Text::new(&definition.text, label),
        }
    }

    /// Outline of the box when centered on `position`.
    pub fn bounds_at(&self, position: Point) -> Bounds {
        position.to_bounds(self.size())
    }

    fn separator_y(&self, bounds: Bounds) -> Option<f32> {
        let lines = self.text.line_count();
        if !self.definition.compartments || lines < 2 {
            return None;
        }

        let text_height = self.text.calculate_size().height();
        let line_height = text_height / lines as f32;
        let text_top = bounds.center().y() - text_height / 2.0;
        Some(text_top + line_height)
    }
}

impl Drawable for NodeBox<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = self.bounds_at(position);

        let fill = self
            .definition
            .fill_color
            .map_or_else(|| "none".to_string(), |color| color.to_hex());
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", self.definition.corner_radius)
            .set("fill", fill);
        let rect = crate::apply_stroke!(rect, &self.definition.stroke);
        output.add_to_layer(RenderLayer::Content, Box::new(rect));

        if let Some(y) = self.separator_y(bounds) {
            let rule = svg_element::Line::new()
                .set("x1", bounds.min_x())
                .set("y1", y)
                .set("x2", bounds.max_x())
                .set("y2", y);
            let rule = crate::apply_stroke!(rule, &self.definition.stroke);
            output.add_to_layer(RenderLayer::Content, Box::new(rule));
        }

        output.merge(self.text.render_to_layers(position));
        output
    }

    fn size(&self) -> Size {
        let content = self.text.calculate_size().add_padding(self.definition.padding);
        content.max(Size::new(self.definition.min_width, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn rendered(node_box: &NodeBox, position: Point) -> String {
        node_box
            .render_to_layers(position)
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_size_respects_min_width() {
        let mut definition = NodeBoxDefinition::new();
        definition.set_min_width(300.0);

        let node_box = NodeBox::new(&definition, "A");
        assert_approx_eq!(f32, node_box.size().width(), 300.0);
    }

    #[test]
    fn test_size_grows_with_label() {
        let definition = NodeBoxDefinition::new();
        let short = NodeBox::new(&definition, "A").size();
        let long = NodeBox::new(
            &definition,
            "ParallaxChartService\n+generateParallaxData(data)",
        )
        .size();

        assert!(long.width() > short.width());
        assert!(long.height() > short.height());
    }

    #[test]
    fn test_bounds_centered_on_position() {
        let definition = NodeBoxDefinition::new();
        let node_box = NodeBox::new(&definition, "Server");
        let bounds = node_box.bounds_at(Point::new(100.0, 40.0));

        assert_approx_eq!(f32, bounds.center().x(), 100.0, epsilon = 0.001);
        assert_approx_eq!(f32, bounds.center().y(), 40.0, epsilon = 0.001);
        assert_approx_eq!(f32, bounds.width(), node_box.size().width(), epsilon = 0.001);
        assert_approx_eq!(f32, bounds.height(), node_box.size().height(), epsilon = 0.001);
    }

    #[test]
    fn test_multiline_label_draws_separator() {
        let definition = NodeBoxDefinition::new();
        let class_box = NodeBox::new(&definition, "server.js\n+startServer()");
        let plain_box = NodeBox::new(&definition, "server.js");

        assert!(rendered(&class_box, Point::new(50.0, 50.0)).contains("<line"));
        assert!(!rendered(&plain_box, Point::new(50.0, 50.0)).contains("<line"));
    }

    #[test]
    fn test_separator_can_be_disabled() {
        let mut definition = NodeBoxDefinition::new();
        definition.set_compartments(false);
        let node_box = NodeBox::new(&definition, "server.js\n+startServer()");

        assert!(!rendered(&node_box, Point::new(50.0, 50.0)).contains("<line"));
    }

    #[test]
    fn test_no_fill_renders_none() {
        let mut definition = NodeBoxDefinition::new();
        definition.set_fill_color(None);
        let node_box = NodeBox::new(&definition, "A");

        assert!(rendered(&node_box, Point::default()).contains("fill=\"none\""));
    }
}
