use crate::config::FallbackConfig;
use crate::ir::{Node, Position};

/// Grid arrangement used when the tree layout fails. Nodes carrying one of the
/// configured preserve flags keep their current position.
pub fn fallback_layout(nodes: &[Node], config: &FallbackConfig) -> Vec<Position> {
    log::warn!("using fallback grid arrangement for {} node(s)", nodes.len());
    let columns = config.columns.max(1);
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if config.preserve_flags.iter().any(|flag| node.has_flag(flag)) {
                return node.position;
            }
            let row = (index / columns) as f32;
            let col = (index % columns) as f32;
            Position::new(
                config.origin_x + col * config.spacing_x,
                config.origin_y + row * config.spacing_y,
            )
        })
        .collect()
}
