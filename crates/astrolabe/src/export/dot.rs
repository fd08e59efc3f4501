//! Graphviz DOT source output.
//!
//! The DOT text is produced without Graphviz installed. Node boxes and edges
//! carry the theme's colors and fonts so `dot -Tpng` gives a drawing close to
//! the native one.

use std::fmt;

use astrolabe_core::{color::Color, diagram::Diagram};

use crate::{
    export::{self, Exporter},
    theme::Theme,
};

/// Quotes `value` as a DOT string: backslashes and quotes are escaped and line
/// breaks become `\n`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Graph, node and edge defaults derived from a theme, as DOT attribute lists.
pub(crate) struct Defaults {
    pub(crate) graph: Vec<(&'static str, String)>,
    pub(crate) node: Vec<(&'static str, String)>,
    pub(crate) edge: Vec<(&'static str, String)>,
}

impl Defaults {
    pub(crate) fn from_theme(theme: &Theme) -> Self {
        let node_text = theme.node().text();
        let edge_text = theme.edge_text();
        let color = |c: Color| quote(&c.to_hex());

        let mut graph = vec![("rankdir", "TB".to_string())];
        if let Some(background) = theme.background() {
            graph.push(("bgcolor", color(background)));
        }

        let mut node = vec![
            ("shape", "box".to_string()),
            ("fontname", quote(node_text.font_family())),
            ("fontsize", node_text.font_size().to_string()),
            ("color", color(theme.node().stroke().color())),
        ];
        if let Some(fill) = theme.node().fill_color() {
            node.push(("style", "filled".to_string()));
            node.push(("fillcolor", color(fill)));
        }

        let edge = vec![
            ("color", color(theme.arrow().stroke().color())),
            ("fontname", quote(edge_text.font_family())),
            ("fontsize", edge_text.font_size().to_string()),
        ];

        Self { graph, node, edge }
    }
}

/// Displays a diagram as a DOT `digraph`.
pub struct Dot<'a> {
    diagram: &'a Diagram,
    defaults: Defaults,
}

impl<'a> Dot<'a> {
    pub fn new(diagram: &'a Diagram, theme: &Theme) -> Self {
        Self {
            diagram,
            defaults: Defaults::from_theme(theme),
        }
    }
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &[(&str, String)]) -> fmt::Result {
    let joined = attributes
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, "[{joined}]")
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {} {{", quote(self.diagram.name()))?;

        for (name, attributes) in [
            ("graph", &self.defaults.graph),
            ("node", &self.defaults.node),
            ("edge", &self.defaults.edge),
        ] {
            write!(f, "    {name} ")?;
            write_attributes(f, attributes)?;
            writeln!(f, ";")?;
        }

        for node in self.diagram.nodes() {
            writeln!(
                f,
                "    {} [label={}];",
                quote(&node.id().as_string()),
                quote(node.label())
            )?;
        }

        for edge in self.diagram.edges() {
            write!(
                f,
                "    {} -> {}",
                quote(&edge.source().as_string()),
                quote(&edge.target().as_string())
            )?;
            if !edge.label().is_empty() {
                write!(f, " [label={}]", quote(edge.label()))?;
            }
            writeln!(f, ";")?;
        }

        writeln!(f, "}}")
    }
}

/// [`Exporter`] writing DOT source text.
pub struct DotExporter<'a> {
    theme: &'a Theme,
}

impl<'a> DotExporter<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Exporter for DotExporter<'_> {
    fn export(&self, diagram: &Diagram) -> Result<Vec<u8>, export::Error> {
        Ok(Dot::new(diagram, self.theme).to_string().into_bytes())
    }
}
