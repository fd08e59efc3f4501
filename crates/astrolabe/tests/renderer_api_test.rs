//! Integration tests for the Renderer API
//!
//! These tests render real files into temporary directories.

use std::fs;

use astrolabe::{
    AstrolabeError, Diagram, DiagramError, OutputFormat, Renderer, catalog,
    config::{AppConfig, Backend, LayoutConfig, RenderConfig, StyleConfig},
    identifier::Id,
    layout::LayoutEngine,
};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn alpha_beta() -> Diagram {
    let mut diagram = Diagram::new("AlphaBeta");
    diagram.add_node("A", "Alpha").unwrap();
    diagram.add_node("B", "Beta").unwrap();
    diagram.add_edge("A", "B", "uses").unwrap();
    diagram
}

#[test]
fn test_render_two_node_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    astrolabe::render(&alpha_beta(), &path, OutputFormat::Png).expect("Failed to render");

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(PNG_SIGNATURE));
    assert!(bytes.len() > PNG_SIGNATURE.len());
}

#[test]
fn test_render_single_node_without_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("single.png");

    let mut diagram = Diagram::new("Single");
    diagram.add_node("Server", "server.js\n+startServer()").unwrap();

    astrolabe::render(&diagram, &path, OutputFormat::Png).expect("Failed to render");
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn test_rendering_twice_leaves_diagram_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = alpha_beta();
    let before = diagram.clone();
    let renderer = Renderer::default();

    renderer
        .render(&diagram, dir.path().join("first.png"), OutputFormat::Png)
        .unwrap();
    renderer
        .render(&diagram, dir.path().join("second.svg"), OutputFormat::Svg)
        .unwrap();

    assert_eq!(diagram, before);
    assert!(dir.path().join("first.png").exists());
    assert!(dir.path().join("second.svg").exists());
}

#[test]
fn test_missing_directory_is_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.png");

    let err = astrolabe::render(&alpha_beta(), &path, OutputFormat::Png).unwrap_err();

    assert!(matches!(err, AstrolabeError::Render(_)), "got {err:?}");
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_editor_service_renders_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor_service_class_diagram.png");

    let diagram = catalog::editor_service().unwrap();
    assert_eq!(diagram.node_count(), 8);
    assert_eq!(diagram.edge_count(), 7);

    Renderer::default()
        .render(&diagram, &path, OutputFormat::Png)
        .expect("Failed to render editor service");
    assert!(fs::read(&path).unwrap().starts_with(PNG_SIGNATURE));
}

#[test]
fn test_svg_contains_labels_and_arrows() {
    let diagram = catalog::editor_service().unwrap();
    let svg = Renderer::default().render_svg(&diagram).unwrap();

    assert!(svg.contains("</svg>"));
    assert_eq!(svg.matches("marker-end").count(), 7);
    for text in ["EditorController", "+handleRequest(req, res)", "authenticates via API"] {
        assert!(svg.contains(text), "missing `{text}`");
    }
}

#[test]
fn test_dot_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.dot");

    let diagram = catalog::editor_service().unwrap();
    Renderer::default()
        .render(&diagram, &path, OutputFormat::Dot)
        .unwrap();

    let dot = fs::read_to_string(&path).unwrap();
    assert!(dot.starts_with("digraph \"EditorService\""));
    assert_eq!(dot.matches(" -> ").count(), 7);
    for node in diagram.nodes() {
        assert!(dot.contains(&format!("\"{}\" [label=", node.id())));
    }
    assert!(dot.contains(r#"[label="Editor.js\n+initializeEditor()"]"#));
    assert!(dot.contains(r#""DashboardJS" -> "EditorController" [label="retrieves data"];"#));
}

#[test]
fn test_both_engines_keep_nodes_inside_layout() {
    let diagram = catalog::editor_service().unwrap();

    for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
        let config = AppConfig::new(
            LayoutConfig::new(engine),
            StyleConfig::default(),
            RenderConfig::default(),
        );
        let layout = Renderer::new(config).layout(&diagram).unwrap();
        let size = layout.size();

        assert_eq!(layout.nodes().len(), diagram.node_count());
        for node in layout.nodes() {
            let bounds = node.bounds();
            assert!(bounds.min_x() >= 0.0 && bounds.min_y() >= 0.0);
            assert!(bounds.max_x() <= size.width() && bounds.max_y() <= size.height());
        }

        let bounds: Vec<_> = layout.nodes().iter().map(|n| n.bounds()).collect();
        for (i, a) in bounds.iter().enumerate() {
            for b in &bounds[i + 1..] {
                assert!(!a.intersects(b), "{engine}: {a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn test_invalid_config_is_reported_on_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.svg");
    let config = AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default().with_edge_color("not-a-color"),
        RenderConfig::default(),
    );

    let err = Renderer::new(config)
        .render(&alpha_beta(), &path, OutputFormat::Svg)
        .unwrap_err();
    assert!(matches!(err, AstrolabeError::Config(_)));
    assert!(!path.exists());
}

#[test]
fn test_png_scale() {
    let scaled = AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default(),
        RenderConfig::new(Backend::Native, 2.0),
    );

    let small = Renderer::default()
        .render_to_bytes(&alpha_beta(), OutputFormat::Png)
        .unwrap();
    let large = Renderer::new(scaled)
        .render_to_bytes(&alpha_beta(), OutputFormat::Png)
        .unwrap();

    let width = |png: &[u8]| u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    assert!(width(&large) >= 2 * width(&small) - 1);
}

#[cfg(not(feature = "graphviz"))]
#[test]
fn test_graphviz_backend_requires_feature() {
    let config = AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default(),
        RenderConfig::new(Backend::Graphviz, 1.0),
    );
    let renderer = Renderer::new(config);

    let err = renderer
        .render_to_bytes(&alpha_beta(), OutputFormat::Png)
        .unwrap_err();
    assert!(matches!(err, AstrolabeError::Render(_)));

    // DOT output never needs Graphviz.
    assert!(renderer.render_to_bytes(&alpha_beta(), OutputFormat::Dot).is_ok());
}

#[test]
fn test_construction_errors() {
    let mut diagram = Diagram::new("Errors");
    diagram.add_node("A", "Alpha").unwrap();

    assert_eq!(
        diagram.add_node("A", "Other").unwrap_err(),
        DiagramError::DuplicateIdentifier { id: Id::new("A") }
    );
    assert_eq!(diagram.node(Id::new("A")).unwrap().label(), "Alpha");

    let err = diagram.add_edge("X", "Y", "z").unwrap_err();
    assert_eq!(
        err,
        DiagramError::DanglingReference {
            from: Id::new("X"),
            to: Id::new("Y"),
            missing: vec![Id::new("X"), Id::new("Y")],
        }
    );
    assert_eq!(diagram.edge_count(), 0);
}
