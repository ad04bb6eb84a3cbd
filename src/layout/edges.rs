use std::collections::HashSet;

use crate::ir::{Edge, Node};

#[derive(Debug, Clone, Default)]
pub struct EdgeValidation {
    pub valid: Vec<Edge>,
    pub removed: Vec<Edge>,
}

impl EdgeValidation {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Splits `edges` into those whose endpoints both exist in `nodes` and the dangling rest.
pub fn validate_edges(nodes: &[Node], edges: &[Edge]) -> EdgeValidation {
    let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut validation = EdgeValidation::default();
    for edge in edges {
        let source_exists = node_ids.contains(edge.source.as_str());
        let target_exists = node_ids.contains(edge.target.as_str());
        if source_exists && target_exists {
            validation.valid.push(edge.clone());
        } else {
            log::debug!(
                "dropping edge {} ({} -> {}): source exists={}, target exists={}",
                edge.id,
                edge.source,
                edge.target,
                source_exists,
                target_exists
            );
            validation.removed.push(edge.clone());
        }
    }
    if !validation.removed.is_empty() {
        log::info!(
            "removed {} dangling edge(s) of {}",
            validation.removed.len(),
            edges.len()
        );
    }
    validation
}

/// Indices of edges repeating an earlier `(source, target)` pair.
pub fn find_duplicate_edges(edges: &[Edge]) -> Vec<usize> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut duplicates = Vec::new();
    for (idx, edge) in edges.iter().enumerate() {
        if !seen.insert((edge.source.as_str(), edge.target.as_str())) {
            duplicates.push(idx);
        }
    }
    if !duplicates.is_empty() {
        log::warn!("{} duplicate edge(s) in graph", duplicates.len());
    }
    duplicates
}
