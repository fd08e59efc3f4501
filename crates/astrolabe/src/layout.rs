//! Node placement for diagrams.
//!
//! A layout assigns every node of a [`Diagram`] a center point. Node sizes
//! are measured up front from their labels, so engines only decide where
//! boxes go, never how big they are.
//!
//! Two engines are available, selected with [`LayoutEngine`]:
//!
//! - [`LayoutEngine::Sugiyama`] - layered drawing of the directed graph.
//! - [`LayoutEngine::Basic`] - a square-ish grid in declaration order.
//!
//! [`EngineBuilder`] carries the spacing settings and runs the selected
//! engine, then translates the result so the drawing starts at the
//! configured padding.

mod basic;
mod sugiyama;

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use log::{debug, info};
use serde::Deserialize;

use astrolabe_core::{
    diagram::Diagram,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::error::AstrolabeError;

/// Available layout engines.
///
/// The names match the configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Grid layout in declaration order.
    Basic,
    /// Sugiyama hierarchical layout (default).
    #[default]
    Sugiyama,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Basic => "basic",
            LayoutEngine::Sugiyama => "sugiyama",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The graph handed to an engine: node sizes in declaration order and edges
/// as index pairs into that order.
#[derive(Debug)]
pub(crate) struct LayoutGraph {
    sizes: Vec<Size>,
    edges: Vec<(usize, usize)>,
}

impl LayoutGraph {
    fn new(diagram: &Diagram, sizes: Vec<Size>) -> Self {
        let edges = diagram
            .edges()
            .iter()
            .filter_map(|edge| {
                Some((
                    diagram.node_index(edge.source())?,
                    diagram.node_index(edge.target())?,
                ))
            })
            .collect();
        Self { sizes, edges }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn size(&self, index: usize) -> Size {
        self.sizes[index]
    }

    pub(crate) fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

/// Trait implemented by every layout engine.
pub(crate) trait Engine {
    /// Returns one center point per node of `graph`, in node order.
    ///
    /// Coordinates may start anywhere; the builder normalizes them.
    fn positions(&self, graph: &LayoutGraph) -> Result<Vec<Point>, AstrolabeError>;
}

/// A node placed by a layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedNode {
    id: Id,
    center: Point,
    size: Size,
}

impl PositionedNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.center, self.size)
    }
}

/// Node placement for a whole diagram.
///
/// Nodes are stored in the diagram's declaration order, so an index from
/// [`Diagram::node_index`] is also an index into [`Layout::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    nodes: Vec<PositionedNode>,
    padding: f32,
}

impl Layout {
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&PositionedNode> {
        self.nodes.get(index)
    }

    /// Margin kept around the drawing.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Union of all node rectangles, or `None` for an empty diagram.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(PositionedNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Size of the drawing including padding on every side.
    pub fn size(&self) -> Size {
        let content = self
            .content_bounds()
            .map_or(Size::default(), |bounds| Size::new(bounds.max_x(), bounds.max_y()));
        Size::new(content.width() + self.padding, content.height() + self.padding)
            .max(Size::new(self.padding * 2.0, self.padding * 2.0))
    }
}

/// Builder for running a layout engine with the configured spacing.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    engine: LayoutEngine,
    horizontal_spacing: f32,
    vertical_spacing: f32,
    padding: f32,
}

impl EngineBuilder {
    /// Create a new engine builder with default spacing.
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
            padding: 35.0,
        }
    }

    /// Set the horizontal gap between neighboring nodes.
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the vertical gap between rows.
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the margin around the whole drawing.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Lay out `diagram` whose node boxes have the given `sizes`.
    ///
    /// `sizes` holds one entry per node in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::Layout`] if the sizes do not match the
    /// diagram or the engine fails.
    pub fn build(&self, diagram: &Diagram, sizes: Vec<Size>) -> Result<Layout, AstrolabeError> {
        if sizes.len() != diagram.node_count() {
            return Err(AstrolabeError::Layout(format!(
                "expected {} node sizes, got {}",
                diagram.node_count(),
                sizes.len()
            )));
        }

        info!(
            engine:% = self.engine,
            nodes = diagram.node_count(),
            edges = diagram.edge_count();
            "Calculating layout"
        );

        let graph = LayoutGraph::new(diagram, sizes);
        let positions = match self.engine {
            LayoutEngine::Basic => basic::Engine::new()
                .with_spacing(self.horizontal_spacing, self.vertical_spacing)
                .positions(&graph)?,
            LayoutEngine::Sugiyama => sugiyama::Engine::new()
                .with_spacing(self.horizontal_spacing, self.vertical_spacing)
                .positions(&graph)?,
        };

        let nodes: Vec<PositionedNode> = diagram
            .nodes()
            .zip(positions)
            .enumerate()
            .map(|(index, (node, center))| PositionedNode {
                id: node.id(),
                center,
                size: graph.size(index),
            })
            .collect();

        let layout = self.normalize(nodes);
        debug!(size:? = layout.size(); "Layout calculated");
        Ok(layout)
    }

    /// Translates nodes so their combined bounds start at `(padding, padding)`.
    fn normalize(&self, mut nodes: Vec<PositionedNode>) -> Layout {
        let bounds = nodes
            .iter()
            .map(PositionedNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds));

        if let Some(bounds) = bounds {
            let offset = Point::new(self.padding, self.padding).sub_point(bounds.min_point());
            for node in &mut nodes {
                node.center = node.center.add_point(offset);
            }
        }

        Layout {
            nodes,
            padding: self.padding,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new(LayoutEngine::default())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn diagram_with_sizes() -> (Diagram, Vec<Size>) {
        let mut diagram = Diagram::new("layout");
        diagram.add_node("A", "Alpha").unwrap();
        diagram.add_node("B", "Beta").unwrap();
        diagram.add_node("C", "Gamma").unwrap();
        diagram.add_edge("A", "B", "uses").unwrap();
        diagram.add_edge("B", "C", "calls").unwrap();
        let sizes = vec![Size::new(80.0, 30.0), Size::new(120.0, 40.0), Size::new(90.0, 30.0)];
        (diagram, sizes)
    }

    #[test]
    fn test_layout_engine_from_str() {
        assert_eq!("basic".parse::<LayoutEngine>(), Ok(LayoutEngine::Basic));
        assert_eq!("sugiyama".parse::<LayoutEngine>(), Ok(LayoutEngine::Sugiyama));
        assert!("force".parse::<LayoutEngine>().is_err());
        assert_eq!(LayoutEngine::default().to_string(), "sugiyama");
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let (diagram, _) = diagram_with_sizes();
        let err = EngineBuilder::default()
            .build(&diagram, vec![Size::new(1.0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, AstrolabeError::Layout(_)));
    }

    #[test]
    fn test_layout_starts_at_padding() {
        let (diagram, sizes) = diagram_with_sizes();
        for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
            let layout = EngineBuilder::new(engine)
                .with_padding(20.0)
                .build(&diagram, sizes.clone())
                .unwrap();

            let bounds = layout.content_bounds().unwrap();
            assert_approx_eq!(f32, bounds.min_x(), 20.0, epsilon = 0.01);
            assert_approx_eq!(f32, bounds.min_y(), 20.0, epsilon = 0.01);

            let size = layout.size();
            assert_approx_eq!(f32, size.width(), bounds.max_x() + 20.0, epsilon = 0.01);
            assert_approx_eq!(f32, size.height(), bounds.max_y() + 20.0, epsilon = 0.01);
        }
    }

    #[test]
    fn test_nodes_keep_declaration_order_and_sizes() {
        let (diagram, sizes) = diagram_with_sizes();
        let layout = EngineBuilder::default().build(&diagram, sizes.clone()).unwrap();

        let ids: Vec<String> = layout.nodes().iter().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        for (node, size) in layout.nodes().iter().zip(&sizes) {
            assert_eq!(node.size(), *size);
        }
    }

    #[test]
    fn test_empty_diagram_has_padding_only() {
        let diagram = Diagram::new("empty");
        let layout = EngineBuilder::default().with_padding(10.0).build(&diagram, vec![]).unwrap();

        assert!(layout.nodes().is_empty());
        assert!(layout.content_bounds().is_none());
        assert_eq!(layout.size(), Size::new(20.0, 20.0));
    }
}
