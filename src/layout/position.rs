use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::ir::{Node, NodeType, Position};

use super::error::{LayoutError, Result};
use super::levels::Levels;
use super::relations::Relationships;
use super::subtree::{uniform_offsets, weighted_offsets};
use super::unify::UnifiedRows;

pub(super) struct Positioner<'a> {
    pub nodes: &'a HashMap<&'a str, &'a Node>,
    pub relations: &'a Relationships,
    pub levels: &'a Levels,
    pub unified: &'a UnifiedRows,
    pub weights: Option<&'a HashMap<String, f32>>,
    pub config: &'a LayoutConfig,
}

impl Positioner<'_> {
    fn node_type(&self, id: &str) -> NodeType {
        self.nodes
            .get(id)
            .map(|node| node.node_type())
            .unwrap_or(NodeType::Unknown)
    }

    /// Y of each level. Rows under RRP nodes that render band tables get extra
    /// room so the taller boxes do not run into their children.
    pub fn level_offsets(&self) -> Vec<f32> {
        let mut offsets = Vec::with_capacity(self.levels.buckets.len());
        let mut y = self.config.margin_y;
        for (level, bucket) in self.levels.buckets.iter().enumerate() {
            if level > 0 {
                y += self.config.vertical_spacing + self.extra_height(&self.levels.buckets[level - 1]);
            }
            offsets.push(y);
            log::trace!("level {level}: {} node(s) at y={y}", bucket.len());
        }
        offsets
    }

    fn extra_height(&self, bucket: &[String]) -> f32 {
        bucket
            .iter()
            .filter_map(|id| self.nodes.get(id.as_str()))
            .filter(|node| node.node_type() == NodeType::Rrp)
            .map(|node| node.band_count() as f32 * self.config.rrp_band_row_height)
            .fold(0.0, f32::max)
    }

    fn sibling_offsets(&self, siblings: &[&str], spacing: f32) -> Vec<f32> {
        match self.weights {
            Some(weights) if siblings.len() > 1 => {
                let values: Vec<f32> = siblings
                    .iter()
                    .map(|id| weights.get(*id).copied().unwrap_or(1.0))
                    .collect();
                weighted_offsets(&values, spacing)
            }
            _ => uniform_offsets(siblings.len(), spacing),
        }
    }

    /// Assigns positions level by level, top to bottom.
    pub fn run(&self) -> Result<HashMap<String, Position>> {
        let offsets = self.level_offsets();
        let mut positions: HashMap<String, Position> = HashMap::new();

        for (level, bucket) in self.levels.buckets.iter().enumerate() {
            let y = offsets[level];

            if level == 0 {
                let roots: Vec<&str> = bucket.iter().map(String::as_str).collect();
                let xs = self.sibling_offsets(&roots, self.config.horizontal_spacing);
                for (id, x) in roots.iter().zip(xs) {
                    positions.insert(id.to_string(), Position::new(x, y));
                }
                continue;
            }

            // Sibling sets: same-level nodes sharing a primary parent, in bucket order.
            let mut sibling_sets: HashMap<&str, Vec<&str>> = HashMap::new();
            for id in bucket {
                if let Some(parent) = self.relations.primary_parent_of(id) {
                    sibling_sets.entry(parent).or_default().push(id.as_str());
                }
            }

            for id in bucket {
                let x = self.node_x(id, level, &sibling_sets, &positions);
                positions.insert(id.clone(), Position::new(x, y));
            }
        }

        for (id, position) in &positions {
            if !position.is_finite() {
                return Err(LayoutError::NonFiniteCoordinate(id.clone()));
            }
        }
        Ok(positions)
    }

    fn node_x(
        &self,
        id: &str,
        level: usize,
        sibling_sets: &HashMap<&str, Vec<&str>>,
        positions: &HashMap<String, Position>,
    ) -> f32 {
        // Parentless nodes are roots and land on level 0, so this only fires for
        // hand-built level tables.
        if self.relations.parents_of(id).is_empty() {
            log::warn!("orphan node {id} at level {level}; placing at x=0");
            return 0.0;
        }
        if let Some(x) = self.unified.x_for(id, level) {
            return x;
        }
        let Some(parent) = self.relations.primary_parent_of(id) else {
            return 0.0;
        };
        let Some(parent_pos) = positions.get(parent) else {
            log::warn!("parent {parent} of {id} is not placed yet; placing at x=0");
            return 0.0;
        };

        let siblings = sibling_sets.get(parent).map(Vec::as_slice).unwrap_or(&[]);
        let index = siblings.iter().position(|s| *s == id).unwrap_or(0);
        if siblings.len() <= 1 {
            return parent_pos.x;
        }

        if self.node_type(id) == NodeType::RrpMember {
            // Centre the cluster under the parent's visual centre, then back to top-left.
            let half_width = self.config.node_width / 2.0;
            let center = parent_pos.x + half_width;
            let offsets = uniform_offsets(siblings.len(), self.config.rrpmember_spacing);
            return center + offsets[index] - half_width;
        }

        let offsets = self.sibling_offsets(siblings, self.config.horizontal_spacing);
        parent_pos.x + offsets[index]
    }
}

/// Shifts every X so the horizontal extent of the graph is centred on zero.
pub fn recenter(positions: &mut HashMap<String, Position>) {
    if positions.is_empty() {
        return;
    }
    let (min_x, max_x) = positions
        .values()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), pos| {
            (lo.min(pos.x), hi.max(pos.x))
        });
    let offset = (min_x + max_x) / 2.0;
    log::debug!("recentering: min_x={min_x}, max_x={max_x}, offset={offset}");
    if offset == 0.0 {
        return;
    }
    for pos in positions.values_mut() {
        pos.x -= offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnifiedRow;
    use crate::ir::Edge;
    use crate::layout::levels::assign_levels;
    use crate::layout::relations::build_relationships;
    use crate::layout::unify::unify_rows;
    use serde_json::json;

    fn run(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> HashMap<String, Position> {
        let index: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let relations = build_relationships(nodes, edges, false);
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let levels = assign_levels(&relations, &ids);
        let types: HashMap<String, NodeType> = nodes.iter().map(|n| (n.id.clone(), n.node_type())).collect();
        let unified = unify_rows(&levels, &types, &config.unified_rows);
        Positioner {
            nodes: &index,
            relations: &relations,
            levels: &levels,
            unified: &unified,
            weights: None,
            config,
        }
        .run()
        .unwrap()
    }

    #[test]
    fn single_child_sits_under_parent() {
        let nodes = vec![
            Node::new("r", NodeType::Network),
            Node::new("m", NodeType::RrpMember),
            Node::new("q", NodeType::QosFlow),
        ];
        let edges = vec![Edge::new("r", "m"), Edge::new("m", "q")];
        let positions = run(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(positions["m"].x, positions["r"].x);
        assert_eq!(positions["q"].x, positions["m"].x);
        assert_eq!(positions["m"].y, 200.0);
        assert_eq!(positions["q"].y, 400.0);
    }

    #[test]
    fn generic_siblings_spread_around_parent_x() {
        let nodes = vec![
            Node::new("p", NodeType::QosFlow),
            Node::new("a", NodeType::FiveQi),
            Node::new("b", NodeType::FiveQi),
            Node::new("c", NodeType::FiveQi),
        ];
        let edges = vec![Edge::new("p", "a"), Edge::new("p", "b"), Edge::new("p", "c")];
        let positions = run(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(positions["a"].x, -350.0);
        assert_eq!(positions["b"].x, 0.0);
        assert_eq!(positions["c"].x, 350.0);
    }

    #[test]
    fn rrpmembers_cluster_under_visual_centre() {
        let nodes = vec![
            Node::new("n", NodeType::Network),
            Node::new("m1", NodeType::RrpMember),
            Node::new("m2", NodeType::RrpMember),
        ];
        let edges = vec![Edge::new("n", "m1"), Edge::new("n", "m2")];
        let positions = run(&nodes, &edges, &LayoutConfig::default());
        // centre 0 + 90; offsets -75/+75; back to top-left by -90
        assert_eq!(positions["m1"].x, -75.0);
        assert_eq!(positions["m2"].x, 75.0);
    }

    #[test]
    fn unified_row_overrides_parent_relative_placement() {
        let nodes = vec![
            Node::new("n", NodeType::Network),
            Node::new("s1", NodeType::SNssai),
            Node::new("s2", NodeType::SNssai),
            Node::new("d1", NodeType::Dnn),
            Node::new("d2", NodeType::Dnn),
            Node::new("d3", NodeType::Dnn),
        ];
        let edges = vec![
            Edge::new("n", "s1"),
            Edge::new("n", "s2"),
            Edge::new("s1", "d1"),
            Edge::new("s2", "d2"),
            Edge::new("s2", "d3"),
        ];
        let positions = run(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(positions["s1"].x, -200.0);
        assert_eq!(positions["s2"].x, 200.0);
        assert_eq!(positions["d1"].x, -400.0);
        assert_eq!(positions["d2"].x, 0.0);
        assert_eq!(positions["d3"].x, 400.0);
        assert_eq!(positions["d1"].y, positions["d3"].y);
    }

    #[test]
    fn multiple_roots_are_treated_as_siblings() {
        let nodes = vec![Node::new("a", NodeType::Network), Node::new("b", NodeType::Network)];
        let positions = run(&nodes, &[], &LayoutConfig::default());
        assert_eq!(positions["a"].x, -175.0);
        assert_eq!(positions["b"].x, 175.0);
    }

    #[test]
    fn unplaced_primary_parent_falls_back_to_zero() {
        let nodes = vec![
            Node::new("r", NodeType::Network),
            Node::new("b", NodeType::QosFlow),
            Node::new("c1", NodeType::FiveQi),
            Node::new("c2", NodeType::FiveQi),
        ];
        // The self-loop comes first, so `b` is its own primary parent.
        let edges = vec![
            Edge::new("b", "b"),
            Edge::new("r", "b"),
            Edge::new("r", "c1"),
            Edge::new("r", "c2"),
        ];
        let positions = run(&nodes, &edges, &LayoutConfig::default());
        assert_eq!(positions["b"], Position::new(0.0, 200.0));
        assert_eq!(positions["c1"].x, -175.0);
        assert_eq!(positions["c2"].x, 175.0);
    }

    #[test]
    fn band_rows_push_the_next_level_down() {
        let rrp = Node::new("rrp-1", NodeType::Rrp).with_data(
            "rrpBands",
            json!([{"name": "n78"}, {"name": "n28"}, {"name": "n1"}]),
        );
        let nodes = vec![
            Node::new("c", NodeType::CellArea),
            rrp,
            Node::new("m", NodeType::RrpMember),
        ];
        let edges = vec![Edge::new("c", "rrp-1"), Edge::new("rrp-1", "m")];
        let config = LayoutConfig::default();
        let positions = run(&nodes, &edges, &config);
        assert_eq!(positions["rrp-1"].y, 200.0);
        assert_eq!(positions["m"].y, 200.0 + 200.0 + 3.0 * config.rrp_band_row_height);
    }

    #[test]
    fn empty_unified_rows_fall_back_to_sibling_rules() {
        let config = LayoutConfig {
            unified_rows: vec![UnifiedRow {
                node_type: NodeType::FiveQi,
                spacing: 400.0,
            }],
            ..LayoutConfig::default()
        };
        let nodes = vec![
            Node::new("n", NodeType::Network),
            Node::new("c1", NodeType::CellArea),
            Node::new("c2", NodeType::CellArea),
        ];
        let edges = vec![Edge::new("n", "c1"), Edge::new("n", "c2")];
        let positions = run(&nodes, &edges, &config);
        assert_eq!(positions["c1"].x, -175.0);
        assert_eq!(positions["c2"].x, 175.0);
    }

    #[test]
    fn recenter_centres_extent_on_zero() {
        let mut positions = HashMap::new();
        positions.insert("a".to_string(), Position::new(100.0, 0.0));
        positions.insert("b".to_string(), Position::new(500.0, 10.0));
        recenter(&mut positions);
        assert_eq!(positions["a"].x, -200.0);
        assert_eq!(positions["b"].x, 200.0);
        assert_eq!(positions["b"].y, 10.0);
    }
}
