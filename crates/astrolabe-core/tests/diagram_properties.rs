//! Property tests for diagram construction.

use std::collections::HashSet;

use proptest::prelude::*;

use astrolabe_core::{
    diagram::{Diagram, DiagramError},
    identifier::Id,
};

/// Node identifiers drawn from a small alphabet so collisions are common.
fn ids_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 1..20)
}

/// Edge endpoints as indices into the declared node list, plus labels.
fn edges_strategy() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
    prop::collection::vec((0usize..32, 0usize..32, "[a-z ]{0,8}"), 0..30)
}

proptest! {
    #[test]
    fn duplicate_identifiers_always_fail(ids in ids_strategy()) {
        let mut diagram = Diagram::new("dups");
        let mut seen = HashSet::new();

        for id in &ids {
            let result = diagram.add_node(id.as_str(), id.to_uppercase());
            if seen.insert(id.clone()) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    DiagramError::DuplicateIdentifier { id: Id::new(id) }
                );
            }
        }

        prop_assert_eq!(diagram.node_count(), seen.len());
    }

    #[test]
    fn undeclared_endpoints_always_dangle(ids in ids_strategy(), edges in edges_strategy()) {
        let mut diagram = Diagram::new("dangling");
        for id in &ids {
            let _ = diagram.add_node(id.as_str(), id.as_str());
        }

        let mut accepted = 0;
        for (source, target, label) in &edges {
            // Indices past the declared list name nodes that were never added.
            let source_name = ids.get(*source).cloned().unwrap_or_else(|| format!("missing{source}"));
            let target_name = ids.get(*target).cloned().unwrap_or_else(|| format!("missing{target}"));
            let should_dangle = *source >= ids.len() || *target >= ids.len();

            match diagram.add_edge(source_name.as_str(), target_name.as_str(), label.as_str()) {
                Ok(_) => {
                    prop_assert!(!should_dangle);
                    accepted += 1;
                }
                Err(DiagramError::DanglingReference { missing, .. }) => {
                    prop_assert!(should_dangle);
                    prop_assert!(!missing.is_empty());
                    for id in missing {
                        prop_assert!(!diagram.contains_node(id));
                    }
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }

        prop_assert_eq!(diagram.edge_count(), accepted);
        for edge in diagram.edges() {
            prop_assert!(diagram.contains_node(edge.source()));
            prop_assert!(diagram.contains_node(edge.target()));
        }
    }
}

#[test]
fn unknown_endpoints_fail_regardless_of_other_edges() {
    let mut diagram = Diagram::new("order");
    diagram.add_node("A", "Alpha").unwrap();
    diagram.add_node("B", "Beta").unwrap();

    // Before any valid edge.
    assert!(matches!(
        diagram.add_edge("A", "Ghost", "x"),
        Err(DiagramError::DanglingReference { .. })
    ));

    diagram.add_edge("A", "B", "uses").unwrap();

    // After a valid edge.
    assert!(matches!(
        diagram.add_edge("Ghost", "B", "x"),
        Err(DiagramError::DanglingReference { .. })
    ));
    assert_eq!(diagram.edge_count(), 1);
}
