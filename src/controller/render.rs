//! Render requests with enter/update/exit sets keyed by node name

use crate::hierarchy::NodeSet;
use serde::Serialize;
use std::collections::HashSet;

/// What the renderer should draw next
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    /// The full node set to lay out
    pub nodes: NodeSet,
    /// Leaves that are new
    pub enter: Vec<String>,
    /// Leaves present before and after (transition in place)
    pub update: Vec<String>,
    /// Leaves that disappear
    pub exit: Vec<String>,
}

impl RenderPlan {
    /// Join the leaves of `previous` and `next` on name
    pub fn between(previous: &NodeSet, next: NodeSet) -> Self {
        let before: HashSet<&str> = previous.leaves().iter().map(|n| n.name.as_str()).collect();
        let after: HashSet<&str> = next.leaves().iter().map(|n| n.name.as_str()).collect();

        let mut enter = Vec::new();
        let mut update = Vec::new();
        for node in next.leaves() {
            if before.contains(node.name.as_str()) {
                update.push(node.name.clone());
            } else {
                enter.push(node.name.clone());
            }
        }
        let exit = previous
            .leaves()
            .iter()
            .filter(|n| !after.contains(n.name.as_str()))
            .map(|n| n.name.clone())
            .collect();

        Self {
            nodes: next,
            enter,
            update,
            exit,
        }
    }

    /// First paint: everything enters
    pub fn initial(nodes: NodeSet) -> Self {
        Self::between(&NodeSet::default(), nodes)
    }
}
