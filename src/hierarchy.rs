//! Parent-linked node sets and the well-formedness check the layout relies on
//!
//! A node set is a flat list of `{name, parent, total}` rows. The renderer
//! turns it into a tree keyed by name, so a set is only renderable when it
//! has exactly one root, unique names, and every parent present.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the synthetic root in every node set
pub const ROOT_NAME: &str = "Origin";

/// One row of a node set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    /// Empty for the root
    pub parent: String,
    pub total: f64,
}

impl HierarchyNode {
    pub fn new(name: &str, parent: &str, total: f64) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.to_string(),
            total,
        }
    }

    /// The synthetic `Origin` root
    pub fn root() -> Self {
        Self::new(ROOT_NAME, "", 0.0)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Ordered node set as handed to the renderer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeSet(pub Vec<HierarchyNode>);

impl NodeSet {
    /// Node set holding only the root
    pub fn root_only() -> Self {
        NodeSet(vec![HierarchyNode::root()])
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&HierarchyNode> {
        self.0.iter().find(|n| n.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|n| n.name.as_str()).collect()
    }

    /// Sum of every node's own total
    pub fn total(&self) -> f64 {
        self.0.iter().map(|n| n.total).sum()
    }

    pub fn push(&mut self, node: HierarchyNode) {
        self.0.push(node);
    }

    /// Nodes no other node names as parent. A root-only set is its own leaf.
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        let parents: HashSet<&str> = self.0.iter().map(|n| n.parent.as_str()).collect();
        self.0
            .iter()
            .filter(|n| !parents.contains(n.name.as_str()))
            .collect()
    }
}

/// A validated node set
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    nodes: NodeSet,
    root: usize,
}

/// Validate a node set: unique names, one root, all parents present
pub fn stratify(nodes: &NodeSet) -> Result<Hierarchy> {
    let mut seen = HashSet::new();
    for node in nodes.nodes() {
        if !seen.insert(node.name.as_str()) {
            return Err(Error::DuplicateNodeName(node.name.clone()));
        }
    }

    let roots: Vec<usize> = nodes
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_root())
        .map(|(i, _)| i)
        .collect();
    let root = match roots.as_slice() {
        [] => return Err(Error::MissingRoot),
        [only] => *only,
        many => {
            return Err(Error::MultipleRoots(
                many.iter().map(|&i| nodes.0[i].name.clone()).collect(),
            ))
        }
    };

    for node in nodes.nodes().iter().filter(|n| !n.is_root()) {
        if !seen.contains(node.parent.as_str()) {
            return Err(Error::MissingParent {
                node: node.name.clone(),
                parent: node.parent.clone(),
            });
        }
    }

    Ok(Hierarchy {
        nodes: nodes.clone(),
        root,
    })
}

impl Hierarchy {
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes.0[self.root]
    }

    pub fn into_node_set(self) -> NodeSet {
        self.nodes
    }

    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        self.nodes.leaves()
    }

    /// Value of the whole tree: the sum of leaf totals
    pub fn value(&self) -> f64 {
        self.leaves().iter().fold(0.0, |acc, n| acc + n.total)
    }

    /// Largest leaf total, used to scale fill colours
    pub fn max_leaf_total(&self) -> f64 {
        self.leaves().iter().map(|n| n.total).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(nodes: &[(&str, &str, f64)]) -> NodeSet {
        NodeSet(
            nodes
                .iter()
                .map(|(n, p, t)| HierarchyNode::new(n, p, *t))
                .collect(),
        )
    }

    #[test]
    fn test_stratify_valid() {
        let nodes = set(&[("Origin", "", 0.0), ("Meat", "Origin", 40.0), ("Fruit", "Origin", 2.0)]);
        let h = stratify(&nodes).unwrap();
        assert_eq!(h.root().name, "Origin");
        assert_eq!(h.leaves().len(), 2);
        assert_eq!(h.value(), 42.0);
        assert_eq!(h.max_leaf_total(), 40.0);
    }

    #[test]
    fn test_stratify_duplicate_name() {
        let nodes = set(&[("Origin", "", 0.0), ("Beef", "Origin", 30.0), ("Beef", "Origin", 5.0)]);
        match stratify(&nodes) {
            Err(Error::DuplicateNodeName(name)) => assert_eq!(name, "Beef"),
            other => panic!("expected DuplicateNodeName, got {:?}", other),
        }
    }

    #[test]
    fn test_stratify_missing_parent() {
        let nodes = set(&[("Origin", "", 0.0), ("Beef", "Meat", 30.0)]);
        assert!(matches!(
            stratify(&nodes),
            Err(Error::MissingParent { ref parent, .. }) if parent == "Meat"
        ));
    }

    #[test]
    fn test_stratify_root_count() {
        assert!(matches!(stratify(&NodeSet::default()), Err(Error::MissingRoot)));
        let two = set(&[("Origin", "", 0.0), ("Other", "", 0.0)]);
        assert!(matches!(stratify(&two), Err(Error::MultipleRoots(ref r)) if r.len() == 2));
    }

    #[test]
    fn test_root_only_is_valid() {
        let h = stratify(&NodeSet::root_only()).unwrap();
        assert_eq!(h.leaves().len(), 1);
        assert_eq!(h.value(), 0.0);
    }

    #[test]
    fn test_node_set_serializes_as_array() {
        let json = serde_json::to_string(&NodeSet::root_only()).unwrap();
        assert_eq!(json, r#"[{"name":"Origin","parent":"","total":0.0}]"#);
    }
}
