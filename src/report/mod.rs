//! Static treemap reports
//!
//! A report is the viewer page with every node set, tooltip and comparison
//! precomputed, so it works offline without the server.

pub mod html;

use crate::aggregate::{build_category_summary, build_product_summary};
use crate::category::CATEGORIES;
use crate::compare::{build_comparison, ComparisonChart};
use crate::config::ChartConfig;
use crate::hierarchy::NodeSet;
use crate::record::EmissionRecord;
use crate::style::{self, Layout};
use crate::tooltip;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything the viewer needs to replay the drill-down without a server
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    /// Reports are drawn at the configured maximum size
    pub layout: Layout,
    pub categories: NodeSet,
    /// Product level per category; categories that fail to build are absent
    pub products: BTreeMap<String, NodeSet>,
    /// Tooltip markup by product name
    pub tooltips: BTreeMap<String, String>,
    pub comparisons: BTreeMap<String, ComparisonChart>,
    pub generated_at: String,
}

impl ReportData {
    pub fn build(records: &[EmissionRecord], chart: &ChartConfig) -> Self {
        let mut products = BTreeMap::new();
        let mut tooltips = BTreeMap::new();
        let mut comparisons = BTreeMap::new();

        for info in CATEGORIES.iter() {
            let nodes = match build_product_summary(records, info.name) {
                Ok(nodes) => nodes,
                Err(e) => {
                    tracing::warn!(category = info.name, error = %e, "category left out of report");
                    continue;
                }
            };
            for node in nodes.nodes().iter().filter(|n| !n.is_root()) {
                tooltips.insert(node.name.clone(), tooltip::compare(node).html());
                if let Ok(chart) = build_comparison(records, &node.name) {
                    comparisons.insert(node.name.clone(), chart);
                }
            }
            products.insert(info.name.to_string(), nodes);
        }

        Self {
            layout: style::layout(chart, chart.max_width),
            categories: build_category_summary(records),
            products,
            tooltips,
            comparisons,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Write a report for `records` to `path`
pub fn generate(path: &Path, records: &[EmissionRecord], chart: &ChartConfig) -> crate::Result<()> {
    let data = ReportData::build(records, chart);
    let mut file = std::fs::File::create(path)?;
    html::write(&mut file, &data)?;
    Ok(())
}
