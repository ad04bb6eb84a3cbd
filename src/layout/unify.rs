use std::collections::HashMap;

use crate::config::UnifiedRow;
use crate::ir::NodeType;

use super::levels::Levels;

#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedGroup {
    pub node_type: NodeType,
    pub level: usize,
    /// Members in level-scan discovery order.
    pub members: Vec<String>,
    pub spacing: f32,
}

impl UnifiedGroup {
    /// X offset of the `index`-th member when the row is centred on zero.
    pub fn slot_x(&self, index: usize) -> f32 {
        let count = self.members.len() as f32;
        (index as f32 - (count - 1.0) / 2.0) * self.spacing
    }
}

/// Lookup from node id to its slot in a unified row.
#[derive(Debug, Clone, Default)]
pub struct UnifiedRows {
    pub groups: Vec<UnifiedGroup>,
    slots: HashMap<String, (usize, usize)>,
}

impl UnifiedRows {
    /// Row X for `id` when it belongs to a group placed on `level`.
    pub fn x_for(&self, id: &str, level: usize) -> Option<f32> {
        let (group_idx, index) = *self.slots.get(id)?;
        let group = &self.groups[group_idx];
        (group.level == level).then(|| group.slot_x(index))
    }
}

/// Collects, for each unified row type, the nodes of that type on the first
/// level below the roots holding any. Level 0 is skipped: roots are always
/// spread by the root rule, so an unconnected node must not claim the row.
/// Same-type nodes on other levels are left to the regular parent-relative
/// placement.
pub fn unify_rows(
    levels: &Levels,
    node_types: &HashMap<String, NodeType>,
    rows: &[UnifiedRow],
) -> UnifiedRows {
    let mut unified = UnifiedRows::default();
    for row in rows {
        let of_type = |id: &String| node_types.get(id) == Some(&row.node_type);
        let Some((level, bucket)) = levels
            .buckets
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, bucket)| bucket.iter().any(of_type))
        else {
            continue;
        };
        let members: Vec<String> = bucket.iter().filter(|id| of_type(id)).cloned().collect();

        let stragglers = node_types
            .iter()
            .filter(|(id, kind)| **kind == row.node_type && levels.level_of(id) != Some(level))
            .count();
        if stragglers > 0 {
            log::debug!(
                "{} {} node(s) sit outside the unified row at level {}",
                stragglers,
                row.node_type,
                level
            );
        }

        log::debug!(
            "unified {} row: {} member(s) at level {}",
            row.node_type,
            members.len(),
            level
        );
        let group_idx = unified.groups.len();
        for (index, id) in members.iter().enumerate() {
            unified.slots.entry(id.clone()).or_insert((group_idx, index));
        }
        unified.groups.push(UnifiedGroup {
            node_type: row.node_type,
            level,
            members,
            spacing: row.spacing,
        });
    }
    unified
}
