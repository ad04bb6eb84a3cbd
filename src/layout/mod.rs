mod edges;
mod error;
mod fallback;
mod levels;
mod position;
mod relations;
mod subtree;
pub(crate) mod types;
mod unify;
mod verify;

pub use edges::{EdgeValidation, find_duplicate_edges, validate_edges};
pub use error::LayoutError;
pub use fallback::fallback_layout;
pub use levels::{Levels, assign_levels};
pub use position::recenter;
pub use relations::{Relationships, build_relationships};
pub use subtree::subtree_weights;
pub use types::*;
pub use unify::{UnifiedGroup, UnifiedRows, unify_rows};
pub use verify::verify_arrangement;

use crate::config::LayoutConfig;
use crate::ir::{Edge, Graph, Node, NodeType, Position};
use position::Positioner;
use std::collections::{HashMap, HashSet};

/// Lays out `nodes` as a top-down hierarchy.
///
/// Always returns one node per input node, in input order. Edges with a
/// missing endpoint are dropped from `cleaned_edges`. If the hierarchical
/// layout fails, the grid fallback is used and the reason is reported in
/// [`LayoutResult::outcome`].
pub fn compute_layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> LayoutResult {
    let validation = validate_edges(nodes, edges);
    let duplicate_edges = find_duplicate_edges(&validation.valid).len();
    let removed_edges = validation.removed_count();

    if nodes.is_empty() {
        return LayoutResult {
            nodes: Vec::new(),
            cleaned_edges: validation.valid,
            removed_edges,
            duplicate_edges,
            outcome: LayoutOutcome::Empty,
            bounds: None,
        };
    }

    let (positions, outcome) = match tree_layout(nodes, &validation.valid, config) {
        Ok(positions) => {
            let ordered = nodes
                .iter()
                .map(|node| positions.get(&node.id).copied().unwrap_or(node.position))
                .collect();
            (ordered, LayoutOutcome::Tree)
        }
        Err(err) => {
            log::warn!("hierarchical layout failed: {err}");
            (fallback_layout(nodes, &config.fallback), LayoutOutcome::Fallback(err))
        }
    };

    let nodes: Vec<Node> = nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| Node {
            position,
            ..node.clone()
        })
        .collect();
    let bounds = Bounds::of(&nodes, config);

    LayoutResult {
        nodes,
        cleaned_edges: validation.valid,
        removed_edges,
        duplicate_edges,
        outcome,
        bounds,
    }
}

pub fn compute_graph_layout(graph: &Graph, config: &LayoutConfig) -> LayoutResult {
    compute_layout(&graph.nodes, &graph.edges, config)
}

fn tree_layout(
    nodes: &[Node],
    valid_edges: &[Edge],
    config: &LayoutConfig,
) -> Result<HashMap<String, Position>, LayoutError> {
    check_config(config)?;
    let index = index_nodes(nodes)?;

    let relations = build_relationships(nodes, valid_edges, config.use_parent_id_fallback);
    let node_ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
    let levels = assign_levels(&relations, &node_ids);
    log::debug!(
        "{} root(s), {} level(s) for {} node(s)",
        relations.roots.len(),
        levels.buckets.len(),
        nodes.len()
    );

    let node_types: HashMap<String, NodeType> = nodes
        .iter()
        .map(|node| (node.id.clone(), node.node_type()))
        .collect();
    let unified = unify_rows(&levels, &node_types, &config.unified_rows);
    let weights = config
        .balance_by_subtree
        .then(|| subtree_weights(&relations));

    let mut positions = Positioner {
        nodes: &index,
        relations: &relations,
        levels: &levels,
        unified: &unified,
        weights: weights.as_ref(),
        config,
    }
    .run()?;

    recenter(&mut positions);
    if config.margin_x != 0.0 {
        for pos in positions.values_mut() {
            pos.x += config.margin_x;
        }
    }

    verify_arrangement(nodes, &positions)?;
    Ok(positions)
}

fn index_nodes(nodes: &[Node]) -> Result<HashMap<&str, &Node>, LayoutError> {
    let mut index = HashMap::with_capacity(nodes.len());
    let mut seen = HashSet::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        if node.id.is_empty() {
            return Err(LayoutError::EmptyNodeId(idx));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(LayoutError::DuplicateNodeId(node.id.clone()));
        }
        index.insert(node.id.as_str(), node);
    }
    Ok(index)
}

fn check_config(config: &LayoutConfig) -> Result<(), LayoutError> {
    let mut checks = vec![
        ("nodeWidth", config.node_width),
        ("horizontalSpacing", config.horizontal_spacing),
        ("rrpmemberSpacing", config.rrpmember_spacing),
        ("verticalSpacing", config.vertical_spacing),
        ("rrpBandRowHeight", config.rrp_band_row_height),
    ];
    checks.extend(
        config
            .unified_rows
            .iter()
            .map(|row| ("unifiedRows.spacing", row.spacing)),
    );
    for (name, value) in checks {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidSpacing { name, value });
        }
    }
    // A zero step would stack every level on one row.
    if config.vertical_spacing <= 0.0 {
        return Err(LayoutError::InvalidSpacing {
            name: "verticalSpacing",
            value: config.vertical_spacing,
        });
    }
    if !config.margin_x.is_finite() || !config.margin_y.is_finite() {
        return Err(LayoutError::InvalidSpacing {
            name: "margin",
            value: if config.margin_x.is_finite() {
                config.margin_y
            } else {
                config.margin_x
            },
        });
    }
    Ok(())
}
