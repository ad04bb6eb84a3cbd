#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ids;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, FallbackConfig, LayoutConfig, UnifiedRow, load_config, parse_config};
pub use ids::IdAllocator;
pub use ir::{CreatedBy, Edge, Graph, Node, NodeType, Position};
pub use layout::{LayoutError, LayoutOutcome, LayoutResult, compute_graph_layout, compute_layout};
pub use layout_dump::{LayoutDocument, LayoutDump};

/// Lays out a JSON graph document and returns the dump as JSON.
pub fn layout_document_json(input: &str, config: &LayoutConfig, pretty: bool) -> anyhow::Result<String> {
    let document = LayoutDocument::from_json(input)?;
    let result = compute_layout(&document.nodes, &document.edges, config);
    LayoutDump::from_result(result, document.extra).to_json(pretty)
}
