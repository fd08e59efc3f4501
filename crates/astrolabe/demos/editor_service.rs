//! Example: Rendering the editor service class diagram
//!
//! This example builds a small diagram in code, renders it in every output
//! format, then renders the built-in editor service diagram to PNG.

use astrolabe::{
    Diagram, OutputFormat, Renderer, catalog,
    config::{AppConfig, LayoutConfig, RenderConfig, StyleConfig},
    description,
    layout::LayoutEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building diagram in code...\n");

    let mut diagram = Diagram::new("Storage");
    diagram.add_node("client", "Web Client")?;
    diagram.add_node("server", "API Server\n+handle(request)")?;
    diagram.add_node("database", "Database")?;
    diagram.add_edge("client", "server", "HTTP requests")?;
    diagram.add_edge("server", "database", "SQL queries")?;

    println!("Created diagram:");
    println!("  Name: {}", diagram.name());
    println!("  Nodes: {}", diagram.node_count());
    println!("  Edges: {}", diagram.edge_count());
    println!();

    // The same diagram can be rendered any number of times
    let renderer = Renderer::default();
    for format in [OutputFormat::Svg, OutputFormat::Png, OutputFormat::Dot] {
        let output_path = format!("storage_output.{format}");
        renderer.render(&diagram, &output_path, format)?;
        println!("{format} written to: {output_path}");
    }

    println!("\nEquivalent TOML description:\n");
    println!("{}", description::to_toml(&diagram)?);

    // Built-in diagram with a customized configuration
    let config = AppConfig::new(
        LayoutConfig::new(LayoutEngine::Sugiyama).with_vertical_spacing(100.0),
        StyleConfig::default().with_node_fill_color(Some("#e8f1fb")),
        RenderConfig::default(),
    );
    let editor_service = catalog::editor_service()?;
    let output_path = "editor_service_class_diagram.png";
    Renderer::new(config).render(&editor_service, output_path, OutputFormat::Png)?;
    println!("Editor service diagram written to: {output_path}");

    Ok(())
}
