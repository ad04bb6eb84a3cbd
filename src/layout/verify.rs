use std::collections::HashMap;

use crate::ir::{Node, Position};

use super::error::{LayoutError, Result};

/// Checks that every input node received a finite position.
pub fn verify_arrangement(nodes: &[Node], positions: &HashMap<String, Position>) -> Result<()> {
    let mut positioned = 0usize;
    let mut missing: Option<&str> = None;
    for node in nodes {
        match positions.get(&node.id) {
            Some(pos) if pos.is_finite() => positioned += 1,
            Some(_) => return Err(LayoutError::NonFiniteCoordinate(node.id.clone())),
            None => {
                missing.get_or_insert(node.id.as_str());
            }
        }
    }
    match missing {
        None => Ok(()),
        Some(missing) => Err(LayoutError::IncompleteLayout {
            positioned,
            expected: nodes.len(),
            missing: missing.to_string(),
        }),
    }
}
