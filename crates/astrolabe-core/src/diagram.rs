//! The diagram model: labeled nodes joined by labeled directed edges.
//!
//! A [`Diagram`] is built incrementally with [`Diagram::add_node`] and
//! [`Diagram::add_edge`]. Both operations validate their input up front, so a
//! diagram that was built without errors always satisfies:
//!
//! - node identifiers are unique
//! - every edge endpoint names a node of the same diagram
//!
//! Rendering lives in the `astrolabe` crate and only ever borrows a diagram.
//!
//! # Example
//!
//! ```
//! use astrolabe_core::diagram::{Diagram, DiagramError};
//!
//! let mut diagram = Diagram::new("Example");
//! diagram.add_node("A", "Alpha")?;
//! diagram.add_node("B", "Beta")?;
//! diagram.add_edge("A", "B", "uses")?;
//!
//! assert_eq!(diagram.node_count(), 2);
//! assert_eq!(diagram.edge_count(), 1);
//! # Ok::<(), DiagramError>(())
//! ```

use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

use crate::identifier::Id;

/// Errors raised while building a [`Diagram`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("duplicate node identifier `{id}`")]
    DuplicateIdentifier { id: Id },

    #[error(
        "edge `{from} -> {to}` references undeclared node(s): {}",
        format_ids(missing)
    )]
    DanglingReference {
        from: Id,
        to: Id,
        /// Every endpoint that is not declared, source first.
        missing: Vec<Id>,
    },
}

fn format_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A labeled vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display text; may span several lines separated by `\n`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Iterates the label line by line.
    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.label.lines()
    }
}

/// A labeled directed connection from `source` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    label: String,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Edge text; empty when the edge is unlabeled.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A named directed graph of labeled nodes and edges.
///
/// Nodes and edges keep their insertion order, which makes every exporter
/// deterministic for a given diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    name: String,
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Creates an empty diagram.
    ///
    /// # Arguments
    ///
    /// * `name` - Diagram name, used as the DOT graph name and the SVG title.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a node.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DuplicateIdentifier`] if `id` is already
    /// declared. The existing node keeps its label.
    pub fn add_node(
        &mut self,
        id: impl Into<Id>,
        label: impl Into<String>,
    ) -> Result<&Node, DiagramError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            debug!(id:% = id; "Rejecting duplicate node");
            return Err(DiagramError::DuplicateIdentifier { id });
        }

        let node = Node {
            id,
            label: label.into(),
        };
        trace!(node:?; "Adding node");

        Ok(&*self.nodes.entry(id).or_insert(node))
    }

    /// Declares a directed edge between two declared nodes.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DanglingReference`] listing every endpoint
    /// that has not been declared. The diagram is left unchanged.
    pub fn add_edge(
        &mut self,
        source: impl Into<Id>,
        target: impl Into<Id>,
        label: impl Into<String>,
    ) -> Result<&Edge, DiagramError> {
        let source = source.into();
        let target = target.into();

        let mut missing = Vec::new();
        if !self.contains_node(source) {
            missing.push(source);
        }
        if target != source && !self.contains_node(target) {
            missing.push(target);
        }
        if !missing.is_empty() {
            debug!(source:% = source, target:% = target; "Rejecting dangling edge");
            return Err(DiagramError::DanglingReference {
                from: source,
                to: target,
                missing,
            });
        }

        let edge = Edge {
            source,
            target,
            label: label.into(),
        };
        trace!(edge:?; "Adding edge");
        let index = self.edges.len();
        self.edges.push(edge);

        Ok(&self.edges[index])
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Declaration index of a node.
    pub fn node_index(&self, id: Id) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A diagram without nodes (and therefore without edges).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
