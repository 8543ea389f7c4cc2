//! Flat emission records → treemap node sets
//!
//! Two levels exist: the category summary (root plus the four fixed
//! categories) and a product summary (root plus every product of one
//! category). Both are pure functions of the record list.

use crate::category::{FoodCategory, CATEGORIES};
use crate::error::Result;
use crate::hierarchy::{stratify, HierarchyNode, NodeSet, ROOT_NAME};
use crate::record::EmissionRecord;

/// Which level to aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    AllCategories,
    Category(String),
}

/// Root, Meat, vegetable, Grain, Fruit, with per-category sums of `Total`.
/// Records outside those categories are skipped.
pub fn build_category_summary(records: &[EmissionRecord]) -> NodeSet {
    let mut nodes = NodeSet::root_only();
    for info in CATEGORIES.iter() {
        let total = records_in(records, info.category).fold(0.0, |acc, r| acc + r.total);
        nodes.push(HierarchyNode::new(info.name, ROOT_NAME, total));
    }
    nodes
}

/// Root plus one node per record of `category`, in input order.
///
/// Fails with `DuplicateNodeName` when a product appears twice in the
/// category. A category with no records yields a root-only set.
pub fn build_product_summary(records: &[EmissionRecord], category: &str) -> Result<NodeSet> {
    let mut nodes = NodeSet::root_only();
    for record in records.iter().filter(|r| r.category == category) {
        nodes.push(HierarchyNode::new(&record.product, ROOT_NAME, record.total));
    }
    Ok(stratify(&nodes)?.into_node_set())
}

/// Build the node set for a selector
pub fn build(records: &[EmissionRecord], selector: &Selector) -> Result<NodeSet> {
    match selector {
        Selector::AllCategories => Ok(build_category_summary(records)),
        Selector::Category(name) => build_product_summary(records, name),
    }
}

/// Records belonging to a category, in input order
pub fn records_in<'a>(
    records: &'a [EmissionRecord],
    category: FoodCategory,
) -> impl Iterator<Item = &'a EmissionRecord> + 'a {
    records.iter().filter(move |r| r.category == category.name())
}
