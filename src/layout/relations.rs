use std::collections::{HashMap, HashSet};

use crate::ir::{Edge, Node};

#[derive(Debug, Clone, Default)]
pub struct Relationships {
    pub children: HashMap<String, Vec<String>>,
    pub all_parents: HashMap<String, Vec<String>>,
    /// First parent seen for each node; the anchor used when positioning.
    pub primary_parent: HashMap<String, String>,
    pub roots: Vec<String>,
}

impl Relationships {
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents_of(&self, id: &str) -> &[String] {
        self.all_parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn primary_parent_of(&self, id: &str) -> Option<&str> {
        self.primary_parent.get(id).map(String::as_str)
    }

    fn link(&mut self, source: &str, target: &str) {
        self.children
            .entry(source.to_string())
            .or_default()
            .push(target.to_string());
        self.all_parents
            .entry(target.to_string())
            .or_default()
            .push(source.to_string());
        self.primary_parent
            .entry(target.to_string())
            .or_insert_with(|| source.to_string());
    }
}

/// Derives parent/child maps from already validated edges.
///
/// Repeated `(source, target)` pairs contribute one link. With
/// `use_parent_id_fallback`, a node that no edge points at but whose
/// `data.parentId` names an existing node is linked under that node.
pub fn build_relationships(
    nodes: &[Node],
    valid_edges: &[Edge],
    use_parent_id_fallback: bool,
) -> Relationships {
    let mut relations = Relationships::default();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for edge in valid_edges {
        if seen.insert((edge.source.as_str(), edge.target.as_str())) {
            relations.link(&edge.source, &edge.target);
        }
    }

    if use_parent_id_fallback {
        let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        for node in nodes {
            if !relations.parents_of(&node.id).is_empty() {
                continue;
            }
            let Some(parent) = node.parent_id() else {
                continue;
            };
            if parent != node.id && node_ids.contains(parent) {
                log::debug!("linking {} under {} from data.parentId", node.id, parent);
                relations.link(parent, &node.id);
            }
        }
    }

    relations.roots = nodes
        .iter()
        .filter(|node| relations.parents_of(&node.id).is_empty())
        .map(|node| node.id.clone())
        .collect();

    if relations.roots.is_empty()
        && let Some(first) = nodes.first()
    {
        log::warn!("no root nodes found; using {} as synthetic root", first.id);
        relations.roots.push(first.id.clone());
    }

    relations
}
