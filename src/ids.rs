//! Sequential, human-readable node ids.
//!
//! An [`IdAllocator`] belongs to one editing session: build it fresh when a
//! graph is loaded or cleared and hand it to whatever creates nodes.

use crate::ir::{Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

static NUMBERED_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(cell-area|s-nssai|rrpmember|rrp|dnn|network|qosflow|fiveqi)-(\d+)$").unwrap());

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: BTreeMap<NodeType, u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every counter one past the highest number already used by `nodes`.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut allocator = Self::new();
        allocator.observe(nodes);
        allocator
    }

    pub fn observe(&mut self, nodes: &[Node]) {
        for node in nodes {
            let node_type = node.node_type();
            if let Some(used) = numeric_id(node, node_type) {
                let counter = self.counters.entry(node_type).or_insert(1);
                *counter = (*counter).max(used.saturating_add(1));
            }
        }
        log::debug!("id counters synced from {} nodes: {:?}", nodes.len(), self.counters);
    }

    /// Returns the next number for `node_type` and advances its counter.
    pub fn next(&mut self, node_type: NodeType) -> u32 {
        let counter = self.counters.entry(node_type).or_insert(1);
        let id = *counter;
        *counter = counter.saturating_add(1);
        id
    }

    pub fn next_node_id(&mut self, node_type: NodeType) -> String {
        let n = self.next(node_type);
        format!("{}-{}", node_type, n)
    }

    pub fn peek(&self, node_type: NodeType) -> u32 {
        self.counters.get(&node_type).copied().unwrap_or(1)
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

fn data_key(node_type: NodeType) -> Option<&'static str> {
    match node_type {
        NodeType::Dnn => Some("dnnId"),
        NodeType::SNssai => Some("snssaiId"),
        NodeType::Rrp => Some("rrpId"),
        NodeType::CellArea => Some("cellAreaId"),
        _ => None,
    }
}

fn numeric_id(node: &Node, node_type: NodeType) -> Option<u32> {
    let from_data = data_key(node_type)
        .and_then(|key| node.data.get(key))
        .and_then(|value| match value {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        });
    from_data.or_else(|| {
        let caps = NUMBERED_ID_RE.captures(&node.id)?;
        if NodeType::from_token(caps.get(1)?.as_str()) != Some(node_type) {
            return None;
        }
        caps.get(2)?.as_str().parse::<u32>().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counter_saturates_at_max() {
        let nodes = vec![Node::new("dnn-x", NodeType::Dnn).with_data("dnnId", json!(u32::MAX))];
        let mut ids = IdAllocator::from_nodes(&nodes);
        assert_eq!(ids.next(NodeType::Dnn), u32::MAX);
        assert_eq!(ids.next(NodeType::Dnn), u32::MAX);
    }

    #[test]
    fn counters_start_at_one_and_are_independent() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next(NodeType::Dnn), 1);
        assert_eq!(ids.next(NodeType::Dnn), 2);
        assert_eq!(ids.next(NodeType::Rrp), 1);
        assert_eq!(ids.next_node_id(NodeType::CellArea), "cell-area-1");
    }

    #[test]
    fn seeding_uses_data_fields_and_id_pattern() {
        let nodes = vec![
            Node::new("dnn-a", NodeType::Dnn).with_data("dnnId", json!(4)),
            Node::new("dnn-b", NodeType::Dnn).with_data("dnnId", json!("7")),
            Node::new("cell-area-3", NodeType::CellArea),
            Node::new("s-nssai-x", NodeType::SNssai),
        ];
        let ids = IdAllocator::from_nodes(&nodes);
        assert_eq!(ids.peek(NodeType::Dnn), 8);
        assert_eq!(ids.peek(NodeType::CellArea), 4);
        assert_eq!(ids.peek(NodeType::SNssai), 1);
    }

    #[test]
    fn reset_restarts_every_counter() {
        let mut ids = IdAllocator::new();
        ids.next(NodeType::Rrp);
        ids.next(NodeType::Rrp);
        ids.reset();
        assert_eq!(ids.next(NodeType::Rrp), 1);
    }

    #[test]
    fn separate_sessions_do_not_share_state() {
        let mut first = IdAllocator::new();
        first.next(NodeType::SNssai);
        let mut second = IdAllocator::new();
        assert_eq!(second.next(NodeType::SNssai), 1);
    }
}
