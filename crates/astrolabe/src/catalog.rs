//! Built-in example diagrams.

use astrolabe_core::diagram::{Diagram, DiagramError};

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["editor-service"];

/// Looks up a built-in diagram by name.
pub fn by_name(name: &str) -> Option<Result<Diagram, DiagramError>> {
    match name {
        "editor-service" => Some(editor_service()),
        _ => None,
    }
}

/// Class diagram of an editor web service: its controller, routes, backing
/// services and the front-end modules talking to it.
///
/// ```
/// let diagram = astrolabe::catalog::editor_service().unwrap();
/// assert_eq!(diagram.name(), "EditorService");
/// assert_eq!(diagram.node_count(), 8);
/// assert_eq!(diagram.edge_count(), 7);
/// ```
pub fn editor_service() -> Result<Diagram, DiagramError> {
    let mut diagram = Diagram::new("EditorService");

    for (id, label) in [
        ("EditorController", "EditorController\n+handleRequest(req, res)"),
        ("EditorRoutes", "EditorRoutes\n+defineRoutes(app)"),
        ("ParallaxChartService", "ParallaxChartService\n+generateParallaxData(data)"),
        ("UploadService", "UploadService\n+handleUpload(req, res)"),
        ("EditorJS", "Editor.js\n+initializeEditor()"),
        ("AuthJS", "Auth.js\n+authenticateUser()"),
        ("DashboardJS", "Dashboard.js\n+loadDashboard()"),
        ("Server", "server.js\n+startServer()"),
    ] {
        diagram.add_node(id, label)?;
    }

    for (source, target, label) in [
        ("EditorRoutes", "EditorController", "uses"),
        ("EditorController", "ParallaxChartService", "calls"),
        ("EditorController", "UploadService", "calls"),
        ("EditorJS", "EditorController", "interacts with API"),
        ("AuthJS", "EditorController", "authenticates via API"),
        ("DashboardJS", "EditorController", "retrieves data"),
        ("Server", "EditorRoutes", "registers"),
    ] {
        diagram.add_edge(source, target, label)?;
    }

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use astrolabe_core::identifier::Id;

    use super::*;

    #[test]
    fn test_editor_service_nodes() {
        let diagram = editor_service().unwrap();

        let server = diagram.node(Id::new("Server")).unwrap();
        assert_eq!(server.label_lines().collect::<Vec<_>>(), ["server.js", "+startServer()"]);

        for node in diagram.nodes() {
            assert_eq!(node.label_lines().count(), 2, "{} label", node.id());
        }
    }

    #[test]
    fn test_editor_service_edges() {
        let diagram = editor_service().unwrap();

        let into_controller = diagram
            .edges()
            .iter()
            .filter(|edge| edge.target() == Id::new("EditorController"))
            .count();
        assert_eq!(into_controller, 4);

        let labels: Vec<_> = diagram.edges().iter().map(|edge| edge.label()).collect();
        assert_eq!(
            labels,
            [
                "uses",
                "calls",
                "calls",
                "interacts with API",
                "authenticates via API",
                "retrieves data",
                "registers"
            ]
        );
    }

    #[test]
    fn test_by_name() {
        for name in NAMES {
            assert!(by_name(name).is_some_and(|diagram| diagram.is_ok()));
        }
        assert!(by_name("nope").is_none());
    }
}
