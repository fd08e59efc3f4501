//! SVG rendering of laid-out diagrams.

use std::collections::HashMap;

use log::{debug, trace};
use svg::{
    Document, Node as _,
    node::{
        Text as SvgText,
        element::{self as svg_element, Element},
    },
};

use astrolabe_core::{
    diagram::{Diagram, Edge},
    draw::{Arrow, ArrowDrawer, Drawable, LayeredOutput, NodeBox, RenderLayer, Text},
    geometry::{Bounds, Insets, Point, Size},
};

use crate::{
    export::{self, Exporter},
    layout::{Layout, PositionedNode},
    theme::Theme,
};

/// Gap between a self-loop's outermost point and its label.
const SELF_LOOP_LABEL_GAP: f32 = 4.0;

/// Draws a [`Layout`] with the shapes and colors of a [`Theme`].
pub struct Svg<'a> {
    theme: &'a Theme,
    layout: &'a Layout,
}

impl<'a> Svg<'a> {
    pub fn new(theme: &'a Theme, layout: &'a Layout) -> Self {
        Self { theme, layout }
    }

    /// Builds the SVG document for `diagram`.
    ///
    /// `diagram` must be the diagram the layout was computed for; nodes and
    /// edges missing from the layout are skipped.
    pub fn render_document(&self, diagram: &Diagram) -> Document {
        let mut output = LayeredOutput::new();
        let mut arrow_drawer = ArrowDrawer::new();
        let mut bounds = self.layout.content_bounds();

        for (index, node) in diagram.nodes().enumerate() {
            let Some(placed) = self.layout.node(index) else {
                continue;
            };
            let node_box = NodeBox::new(self.theme.node(), node.label());
            output.merge(node_box.render_to_layers(placed.center()));
        }

        // How many edges were already drawn between the same pair of nodes.
        let mut drawn_between: HashMap<(usize, usize), usize> = HashMap::new();
        for edge in diagram.edges() {
            let (Some(source_index), Some(target_index)) = (
                diagram.node_index(edge.source()),
                diagram.node_index(edge.target()),
            ) else {
                continue;
            };
            let (Some(source), Some(target)) = (
                self.layout.node(source_index),
                self.layout.node(target_index),
            ) else {
                continue;
            };

            let pair = (
                source_index.min(target_index),
                source_index.max(target_index),
            );
            let counter = drawn_between.entry(pair).or_default();
            let occurrence = *counter;
            *counter += 1;

            let (edge_output, edge_bounds) =
                self.render_edge(edge, source, target, occurrence, &mut arrow_drawer);
            output.merge(edge_output);
            bounds = Some(match bounds {
                Some(bounds) => bounds.merge(&edge_bounds),
                None => edge_bounds,
            });
        }

        let view = bounds
            .map(|bounds| bounds.add_padding(Insets::uniform(self.layout.padding())))
            .unwrap_or_else(|| Bounds::new_from_top_left(Point::default(), self.layout.size()));
        debug!(
            width = view.width(),
            height = view.height();
            "SVG dimensions calculated"
        );

        self.assemble_document(diagram.name(), view, &arrow_drawer, output)
    }

    /// Draws one edge and its label, returning the output and the area it covers.
    fn render_edge(
        &self,
        edge: &Edge,
        source: &PositionedNode,
        target: &PositionedNode,
        occurrence: usize,
        arrow_drawer: &mut ArrowDrawer,
    ) -> (LayeredOutput, Bounds) {
        let mut output = LayeredOutput::new();
        let arrow = Arrow::new(self.theme.arrow());
        let label = Text::new(self.theme.edge_text(), edge.label());
        let label_size = label.calculate_size();

        let (mut covered, mut label_position) = if edge.is_self_loop() {
            let node_bounds = source.bounds();
            output.add_to_layer(
                RenderLayer::Arrow,
                arrow_drawer.draw_self_loop(&arrow, node_bounds),
            );

            let apex = Arrow::self_loop_apex(node_bounds);
            let loop_bounds = Bounds::new_from_top_left(
                Point::new(node_bounds.max_x(), node_bounds.min_y()),
                Size::new(apex.x() - node_bounds.max_x(), node_bounds.height()),
            );
            let label_position = Point::new(
                apex.x() + SELF_LOOP_LABEL_GAP + label_size.width() / 2.0,
                apex.y(),
            );
            (loop_bounds, label_position)
        } else {
            let start = source.bounds().boundary_point_towards(target.center());
            let end = target.bounds().boundary_point_towards(source.center());
            output.add_to_layer(
                RenderLayer::Arrow,
                arrow_drawer.draw_arrow(&arrow, start, end),
            );

            let segment = Bounds::new_from_top_left(
                Point::new(start.x().min(end.x()), start.y().min(end.y())),
                Size::new((end.x() - start.x()).abs(), (end.y() - start.y()).abs()),
            );
            (segment, start.midpoint(end))
        };

        if !edge.label().is_empty() {
            // Stack labels of parallel edges instead of drawing them on top of each other.
            label_position = label_position.add_point(Point::new(
                0.0,
                label_size.height() * occurrence as f32,
            ));
            output.merge(label.render_to_layers(label_position));
            covered = covered.merge(&label_position.to_bounds(label_size));
        }

        trace!(
            source:% = edge.source(),
            target:% = edge.target(),
            label_position:? = label_position;
            "Edge rendered"
        );
        (output, covered)
    }

    fn assemble_document(
        &self,
        name: &str,
        view: Bounds,
        arrow_drawer: &ArrowDrawer,
        output: LayeredOutput,
    ) -> Document {
        let mut doc = Document::new()
            .set(
                "viewBox",
                (view.min_x(), view.min_y(), view.width(), view.height()),
            )
            .set("width", view.width())
            .set("height", view.height());

        let mut title = Element::new("title");
        title.append(SvgText::new(name));
        doc = doc.add(title);

        doc = doc.add(arrow_drawer.draw_marker_definitions());

        if let Some(color) = self.theme.background() {
            let background = svg_element::Rectangle::new()
                .set("x", view.min_x())
                .set("y", view.min_y())
                .set("width", view.width())
                .set("height", view.height())
                .set("fill", color)
                .set("fill-opacity", color.alpha());
            doc = doc.add(background);
        }

        for node in output.render() {
            doc = doc.add(node);
        }
        doc
    }
}

impl Exporter for Svg<'_> {
    fn export(&self, diagram: &Diagram) -> Result<Vec<u8>, export::Error> {
        let doc = self.render_document(diagram);
        debug!("SVG document rendered");
        Ok(doc.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::StyleConfig,
        layout::{EngineBuilder, LayoutEngine},
    };

    fn render(diagram: &Diagram) -> String {
        render_with_theme(diagram, &Theme::default())
    }

    fn render_with_theme(diagram: &Diagram, theme: &Theme) -> String {
        let sizes = diagram.nodes().map(|n| theme.node_size(n.label())).collect();
        let layout = EngineBuilder::new(LayoutEngine::Basic)
            .build(diagram, sizes)
            .unwrap();
        Svg::new(theme, &layout).render_document(diagram).to_string()
    }

    #[test]
    fn test_document_has_title_and_markers() {
        let mut diagram = Diagram::new("Small & co");
        diagram.add_node("A", "Alpha").unwrap();
        diagram.add_node("B", "Beta").unwrap();
        diagram.add_edge("A", "B", "uses").unwrap();

        let svg = render(&diagram);
        assert!(svg.contains("<title>"));
        assert!(svg.contains("Small &amp; co"));
        assert!(svg.contains("<marker"));
        assert!(svg.contains("marker-end"));
        assert!(svg.contains("uses"));
    }

    #[test]
    fn test_one_tspan_per_label_line() {
        let mut diagram = Diagram::new("lines");
        diagram
            .add_node("Server", "server.js\n+startServer()")
            .unwrap();

        let svg = render(&diagram);
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains("+startServer()"));
    }

    #[test]
    fn test_one_path_per_edge() {
        let mut diagram = Diagram::new("paths");
        diagram.add_node("A", "A").unwrap();
        diagram.add_node("B", "B").unwrap();
        diagram.add_edge("A", "B", "first").unwrap();
        diagram.add_edge("A", "B", "second").unwrap();
        diagram.add_edge("B", "B", "again").unwrap();

        let svg = render(&diagram);
        assert_eq!(svg.matches("marker-end").count(), 3);
        for label in ["first", "second", "again"] {
            assert!(svg.contains(label), "missing label `{label}`");
        }
    }

    #[test]
    fn test_empty_label_draws_no_text() {
        let mut diagram = Diagram::new("quiet");
        diagram.add_node("A", "A").unwrap();
        diagram.add_node("B", "B").unwrap();
        diagram.add_edge("A", "B", "").unwrap();

        let svg = render(&diagram);
        // Only the two node labels.
        assert_eq!(svg.matches("<text").count(), 2);
    }

    #[test]
    fn test_empty_diagram_renders() {
        let svg = render(&Diagram::new("nothing"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("nothing"));
    }

    #[test]
    fn test_edge_line_and_corner_radius_attributes() {
        let mut diagram = Diagram::new("styled");
        diagram.add_node("A", "A").unwrap();
        diagram.add_node("B", "B").unwrap();
        diagram.add_edge("A", "B", "").unwrap();

        let plain = render_with_theme(
            &diagram,
            &Theme::from_style(&StyleConfig::default()).unwrap(),
        );
        assert!(!plain.contains("stroke-dasharray"));
        assert!(plain.contains("rx=\"0\""));

        let style = StyleConfig::default()
            .with_edge_line("dashed")
            .with_node_corner_radius(6.0);
        let styled = render_with_theme(&diagram, &Theme::from_style(&style).unwrap());
        // The edge is dashed, node outlines stay solid.
        assert_eq!(styled.matches("stroke-dasharray=\"5,5\"").count(), 1);
        assert_eq!(styled.matches("rx=\"6\"").count(), 2);
    }
}
