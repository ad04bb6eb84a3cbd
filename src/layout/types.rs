use crate::config::LayoutConfig;
use crate::ir::{Edge, Node, NodeType};

use super::error::LayoutError;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    /// Nothing to lay out.
    Empty,
    /// The hierarchical layout succeeded.
    Tree,
    /// The hierarchical layout failed and the grid fallback was used.
    Fallback(LayoutError),
}

impl LayoutOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, LayoutOutcome::Fallback(_))
    }
}

/// Rendered box of a node: its type's width, and `node_height` plus one band
/// row per RRP band.
fn box_size(node: &Node, config: &LayoutConfig) -> (f32, f32) {
    let kind = node.node_type();
    let mut height = config.node_height;
    if kind == NodeType::Rrp {
        height += node.band_count() as f32 * config.rrp_band_row_height;
    }
    (kind.default_width(), height)
}

/// Axis-aligned extent of a laid-out graph, using each node's rendered size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn of(nodes: &[Node], config: &LayoutConfig) -> Option<Self> {
        let mut iter = nodes.iter();
        let first = iter.next()?;
        let (w, h) = box_size(first, config);
        let mut bounds = Bounds {
            min_x: first.position.x,
            min_y: first.position.y,
            max_x: first.position.x + w,
            max_y: first.position.y + h,
        };
        for node in iter {
            let (w, h) = box_size(node, config);
            bounds.min_x = bounds.min_x.min(node.position.x);
            bounds.min_y = bounds.min_y.min(node.position.y);
            bounds.max_x = bounds.max_x.max(node.position.x + w);
            bounds.max_y = bounds.max_y.max(node.position.y + h);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Input nodes, same order and ids, with updated positions.
    pub nodes: Vec<Node>,
    /// Input edges minus those with a missing endpoint.
    pub cleaned_edges: Vec<Edge>,
    pub removed_edges: usize,
    pub duplicate_edges: usize,
    pub outcome: LayoutOutcome,
    /// Extent of `nodes`, `None` when there are none.
    pub bounds: Option<Bounds>,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
