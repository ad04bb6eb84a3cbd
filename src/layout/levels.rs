use std::collections::{HashMap, HashSet};

use super::relations::Relationships;

#[derive(Debug, Clone, Default)]
pub struct Levels {
    pub node_level: HashMap<String, usize>,
    /// Node ids per level, in discovery order.
    pub buckets: Vec<Vec<String>>,
}

impl Levels {
    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.node_level.get(id).copied()
    }
}

struct LevelAssigner<'a> {
    relations: &'a Relationships,
    levels: HashMap<&'a str, usize>,
    buckets: Vec<Vec<&'a str>>,
}

impl<'a> LevelAssigner<'a> {
    fn visit(&mut self, node_id: &'a str, level: usize, path: &mut HashSet<&'a str>) {
        if path.contains(node_id) {
            log::debug!("cycle through {node_id}; not re-entering at level {level}");
            return;
        }
        if let Some(&current) = self.levels.get(node_id)
            && current >= level
        {
            return;
        }
        if let Some(old) = self.levels.insert(node_id, level) {
            self.buckets[old].retain(|id| *id != node_id);
        }
        if self.buckets.len() <= level {
            self.buckets.resize_with(level + 1, Vec::new);
        }
        self.buckets[level].push(node_id);

        let relations = self.relations;
        path.insert(node_id);
        for child in relations.children_of(node_id) {
            self.visit(child.as_str(), level + 1, path);
        }
        path.remove(node_id);
    }
}

/// Places every node on the deepest level any of its parents implies.
///
/// Traversal starts at each root with level 0. A node is re-entered only when
/// reached at a deeper level than recorded, and never while it is already on
/// the current path, so cycles terminate at the level reached before the loop
/// closed. Nodes the roots never reach (cycles detached from every root) are
/// walked afterwards from level 0 in input order.
pub fn assign_levels(relations: &Relationships, node_ids: &[String]) -> Levels {
    let mut assigner = LevelAssigner {
        relations,
        levels: HashMap::new(),
        buckets: Vec::new(),
    };
    let mut path = HashSet::new();
    for root in &relations.roots {
        assigner.visit(root.as_str(), 0, &mut path);
    }
    for id in node_ids {
        if !assigner.levels.contains_key(id.as_str()) {
            log::warn!("node {id} is not reachable from any root; starting it at level 0");
            assigner.visit(id.as_str(), 0, &mut path);
        }
    }

    Levels {
        node_level: assigner
            .levels
            .into_iter()
            .map(|(id, level)| (id.to_string(), level))
            .collect(),
        buckets: assigner
            .buckets
            .into_iter()
            .map(|bucket| bucket.into_iter().map(str::to_string).collect())
            .collect(),
    }
}
