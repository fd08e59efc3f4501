//! Rendering through the Graphviz `dot` executable.
//!
//! The diagram is converted to a `dot-structures` graph and handed to `dot`
//! by `graphviz-rust`. Layout is then entirely Graphviz's.

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node, NodeId, Stmt, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec,
    printer::PrinterContext,
};
use log::{debug, error, info};

use astrolabe_core::{diagram::Diagram, identifier::Id};

use crate::{
    export::{self, Exporter, dot::{self, Defaults}},
    format::OutputFormat,
    theme::Theme,
};

fn escaped(value: &str) -> DotId {
    DotId::Escaped(dot::quote(value))
}

fn node_id(id: Id) -> NodeId {
    NodeId(escaped(&id.as_string()), None)
}

/// Attribute values from [`Defaults`] are already valid DOT: quoted strings
/// stay escaped, bare words and numbers stay plain.
fn attributes(pairs: &[(&str, String)]) -> Vec<Attribute> {
    pairs
        .iter()
        .map(|(key, value)| {
            let value = if value.starts_with('"') {
                DotId::Escaped(value.clone())
            } else {
                DotId::Plain(value.clone())
            };
            Attribute(DotId::Plain(key.to_string()), value)
        })
        .collect()
}

/// Builds the `dot-structures` graph for `diagram`.
pub fn to_graph(diagram: &Diagram, theme: &Theme) -> Graph {
    let defaults = Defaults::from_theme(theme);
    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(attributes(&defaults.graph))),
        Stmt::GAttribute(GraphAttributes::Node(attributes(&defaults.node))),
        Stmt::GAttribute(GraphAttributes::Edge(attributes(&defaults.edge))),
    ];

    for node in diagram.nodes() {
        stmts.push(Stmt::Node(Node::new(
            node_id(node.id()),
            vec![Attribute(DotId::Plain("label".to_string()), escaped(node.label()))],
        )));
    }

    for edge in diagram.edges() {
        let mut edge_attributes = Vec::new();
        if !edge.label().is_empty() {
            edge_attributes.push(Attribute(
                DotId::Plain("label".to_string()),
                escaped(edge.label()),
            ));
        }
        stmts.push(Stmt::Edge(Edge {
            ty: EdgeTy::Pair(
                Vertex::N(node_id(edge.source())),
                Vertex::N(node_id(edge.target())),
            ),
            attributes: edge_attributes,
        }));
    }

    Graph::DiGraph {
        id: escaped(diagram.name()),
        strict: false,
        stmts,
    }
}

/// [`Exporter`] running `dot` to produce SVG or PNG bytes.
pub struct Graphviz<'a> {
    theme: &'a Theme,
    format: OutputFormat,
}

impl<'a> Graphviz<'a> {
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for DOT output, which needs no
    /// Graphviz run.
    pub fn new(theme: &'a Theme, format: OutputFormat) -> Result<Self, export::Error> {
        if format == OutputFormat::Dot {
            return Err(export::Error::Render(
                "DOT output is written directly, not through Graphviz".to_string(),
            ));
        }
        Ok(Self { theme, format })
    }
}

impl Exporter for Graphviz<'_> {
    fn export(&self, diagram: &Diagram) -> Result<Vec<u8>, export::Error> {
        let format = match self.format {
            OutputFormat::Png => Format::Png,
            _ => Format::Svg,
        };
        let graph = to_graph(diagram, self.theme);
        debug!(format:% = self.format; "Running Graphviz dot");

        let bytes = exec(
            graph,
            &mut PrinterContext::default(),
            vec![CommandArg::Format(format)],
        )
        .map_err(|err| {
            error!(err:% = err; "Graphviz dot failed");
            export::Error::Graphviz(format!(
                "could not run `dot` (is Graphviz installed?): {err}"
            ))
        })?;

        info!(bytes = bytes.len(); "Graphviz output produced");
        Ok(bytes)
    }
}
