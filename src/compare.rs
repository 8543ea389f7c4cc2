//! Grouped bar chart data: a product's per-stage emissions next to beef
//!
//! One group per compared record, one bar per supply chain stage.

use crate::error::{Error, Result};
use crate::record::{EmissionRecord, Stage};
use serde::Serialize;

/// Products every comparison includes
pub const BASELINE_PRODUCTS: [&str; 2] = ["Bovine Meat (beef herd)", "Bovine Meat (dairy herd)"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub key: Stage,
    pub value: f64,
}

/// One product's bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub product: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    /// The product the chart was requested for
    pub product: String,
    pub groups: Vec<BarGroup>,
    /// Largest stage value across all groups (y domain upper bound)
    pub max_value: f64,
}

/// Build the chart for `product`, keeping record order.
/// Fails when no record has that product name.
pub fn build_comparison(records: &[EmissionRecord], product: &str) -> Result<ComparisonChart> {
    if !records.iter().any(|r| r.product == product) {
        return Err(Error::UnknownProduct(product.to_string()));
    }

    let groups: Vec<BarGroup> = records
        .iter()
        .filter(|r| r.product == product || BASELINE_PRODUCTS.contains(&r.product.as_str()))
        .map(|r| BarGroup {
            product: r.product.clone(),
            bars: Stage::ALL
                .iter()
                .map(|&key| Bar {
                    key,
                    value: key.value(r),
                })
                .collect(),
        })
        .collect();

    let max_value = groups
        .iter()
        .flat_map(|g| g.bars.iter().map(|b| b.value))
        .fold(0.0, f64::max);

    Ok(ComparisonChart {
        product: product.to_string(),
        groups,
        max_value,
    })
}
