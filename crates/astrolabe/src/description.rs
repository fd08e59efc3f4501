//! TOML diagram descriptions.
//!
//! A description declares a diagram outside of Rust code:
//!
//! ```toml
//! name = "Example"
//!
//! [[nodes]]
//! id = "A"
//! label = "Alpha"
//!
//! [[nodes]]
//! id = "B"
//!
//! [[edges]]
//! source = "A"
//! target = "B"
//! label = "uses"
//! ```
//!
//! Node labels default to the identifier, edge labels to the empty string.
//! The diagram is built with [`Diagram::add_node`] and [`Diagram::add_edge`],
//! so duplicate identifiers and dangling edges fail exactly as they do in
//! code.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use astrolabe_core::{diagram::Diagram, identifier::Id};

use crate::error::AstrolabeError;

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct DescriptionFile {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    edges: Vec<EdgeEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct NodeEntry {
    id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct EdgeEntry {
    source: Id,
    target: Id,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    label: String,
}

fn default_name() -> String {
    "Diagram".to_string()
}

/// Parses a TOML description into a [`Diagram`].
///
/// # Errors
///
/// - [`AstrolabeError::Description`] for malformed TOML, with the byte span
///   of the problem when known.
/// - [`AstrolabeError::Diagram`] for duplicate identifiers or edges naming
///   undeclared nodes.
///
/// # Examples
///
/// ```
/// let diagram = astrolabe::description::parse(
///     r#"
///     [[nodes]]
///     id = "A"
///     [[nodes]]
///     id = "B"
///     [[edges]]
///     source = "A"
///     target = "B"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(diagram.node_count(), 2);
/// assert_eq!(diagram.edges()[0].label(), "");
/// ```
pub fn parse(source: &str) -> Result<Diagram, AstrolabeError> {
    info!("Parsing diagram description");

    let file: DescriptionFile = toml::from_str(source).map_err(|err| {
        AstrolabeError::new_description_error(err.message(), err.span(), source)
    })?;

    let mut diagram = Diagram::new(file.name);
    for node in file.nodes {
        let label = node.label.unwrap_or_else(|| node.id.as_string());
        diagram.add_node(node.id, label)?;
    }
    for edge in file.edges {
        diagram.add_edge(edge.source, edge.target, edge.label)?;
    }

    debug!(
        name = diagram.name(),
        nodes = diagram.node_count(),
        edges = diagram.edge_count();
        "Description parsed"
    );
    Ok(diagram)
}

/// Writes `diagram` as a TOML description that [`parse`] reads back.
///
/// Node labels equal to their identifier are left out.
///
/// # Errors
///
/// Returns [`AstrolabeError::Description`] if serialization fails.
pub fn to_toml(diagram: &Diagram) -> Result<String, AstrolabeError> {
    let file = DescriptionFile {
        name: diagram.name().to_string(),
        nodes: diagram
            .nodes()
            .map(|node| NodeEntry {
                id: node.id(),
                label: (node.id() != node.label()).then(|| node.label().to_string()),
            })
            .collect(),
        edges: diagram
            .edges()
            .iter()
            .map(|edge| EdgeEntry {
                source: edge.source(),
                target: edge.target(),
                label: edge.label().to_string(),
            })
            .collect(),
    };

    toml::to_string(&file)
        .map_err(|err| AstrolabeError::new_description_error(err.to_string(), None, ""))
}
