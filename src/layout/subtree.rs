use std::collections::{HashMap, HashSet};

use super::relations::Relationships;

const LEAF_BASE: f32 = 1.5;
const LEAF_DEPTH_STEP: f32 = 0.15;

/// Relative horizontal demand of each node's subtree.
///
/// Leaves weigh `1.5 + depth * 0.15`; an inner node weighs the sum of its
/// children plus a `sqrt(children) * 1.2` fan-out term, damped by depth.
/// Weights are memoised, so a node shared by several parents keeps the weight
/// computed on its first visit.
pub fn subtree_weights(relations: &Relationships) -> HashMap<String, f32> {
    let mut weights = HashMap::new();
    let mut path = HashSet::new();
    for root in &relations.roots {
        weigh(root, 0, relations, &mut weights, &mut path);
    }
    weights
}

fn weigh<'a>(
    node_id: &'a str,
    depth: usize,
    relations: &'a Relationships,
    weights: &mut HashMap<String, f32>,
    path: &mut HashSet<&'a str>,
) -> f32 {
    if let Some(weight) = weights.get(node_id) {
        return *weight;
    }
    let leaf = LEAF_BASE + depth as f32 * LEAF_DEPTH_STEP;
    let children = relations.children_of(node_id);
    if children.is_empty() || !path.insert(node_id) {
        weights.insert(node_id.to_string(), leaf);
        return leaf;
    }

    let total: f32 = children
        .iter()
        .map(|child| weigh(child, depth + 1, relations, weights, path))
        .sum();
    path.remove(node_id);

    let fan_out = (children.len() as f32).sqrt() * 1.2;
    let depth_factor = (1.0 - depth as f32 * 0.03).max(0.8);
    let weight = (total + fan_out.max(1.0)) * depth_factor;
    weights.insert(node_id.to_string(), weight);
    weight
}

/// Centres of `weights.len()` slots laid side by side around zero, each slot
/// `spacing * weight / min_weight` wide. Equal weights give uniform spacing.
pub fn weighted_offsets(weights: &[f32], spacing: f32) -> Vec<f32> {
    let min = weights
        .iter()
        .copied()
        .filter(|w| *w > 0.0)
        .fold(f32::INFINITY, f32::min);
    if weights.is_empty() || !min.is_finite() {
        return uniform_offsets(weights.len(), spacing);
    }
    let widths: Vec<f32> = weights
        .iter()
        .map(|w| spacing * (w.max(min) / min))
        .collect();

    let mut centers = Vec::with_capacity(widths.len());
    let mut cursor = 0.0f32;
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            cursor += (widths[idx - 1] + width) / 2.0;
        }
        centers.push(cursor);
    }
    let mid = (centers[0] + centers[centers.len() - 1]) / 2.0;
    centers.iter().map(|c| c - mid).collect()
}

pub fn uniform_offsets(count: usize, spacing: f32) -> Vec<f32> {
    let half = (count as f32 - 1.0) / 2.0;
    (0..count).map(|idx| (idx as f32 - half) * spacing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Edge, Node, NodeType};
    use crate::layout::relations::build_relationships;

    fn relations(ids: &[&str], edges: &[(&str, &str)]) -> Relationships {
        let nodes: Vec<Node> = ids.iter().map(|id| Node::new(*id, NodeType::Unknown)).collect();
        let edges: Vec<Edge> = edges.iter().map(|(s, t)| Edge::new(*s, *t)).collect();
        build_relationships(&nodes, &edges, false)
    }

    #[test]
    fn leaf_weight_grows_with_depth() {
        let weights = subtree_weights(&relations(&["r", "a"], &[("r", "a")]));
        assert!((weights["a"] - 1.65).abs() < 1e-5);
        // (1.65 + max(1, 1.2)) * 1.0
        assert!((weights["r"] - 2.85).abs() < 1e-5);
    }

    #[test]
    fn wider_subtrees_weigh_more() {
        let weights = subtree_weights(&relations(
            &["r", "a", "b", "a1", "a2", "a3"],
            &[("r", "a"), ("r", "b"), ("a", "a1"), ("a", "a2"), ("a", "a3")],
        ));
        assert!(weights["a"] > weights["b"]);
    }

    #[test]
    fn cycles_do_not_recurse_forever() {
        let weights = subtree_weights(&relations(&["a", "b"], &[("a", "b"), ("b", "a")]));
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn equal_weights_match_uniform_spacing() {
        let weighted = weighted_offsets(&[2.0, 2.0, 2.0], 350.0);
        assert_eq!(weighted, uniform_offsets(3, 350.0));
        assert_eq!(weighted, vec![-350.0, 0.0, 350.0]);
    }

    #[test]
    fn heavy_sibling_gets_a_wider_slot() {
        let offsets = weighted_offsets(&[1.0, 3.0, 1.0], 100.0);
        // slots 100, 300, 100: centres 0, 200, 400 before centring
        assert_eq!(offsets, vec![-200.0, 0.0, 200.0]);
        let skewed = weighted_offsets(&[3.0, 1.0], 100.0);
        assert_eq!(skewed, vec![-100.0, 100.0]);
    }
}
