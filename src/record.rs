//! Emission records as loaded from the food emissions data file
//!
//! One record per product, with its category and the kg CO2-eq contributed by
//! each stage of the supply chain. The data file uses the published CSV layout:
//!
//! ```text
//! Category,Product,Total,Farm,Feed,Processing,Retail,Transport
//! Meat,Bovine Meat (beef herd),43.3,36.4,2.7,1.3,0.2,0.3
//! ```
//!
//! Extra columns are ignored.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// A single product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Farm")]
    pub farm: f64,
    #[serde(rename = "Feed")]
    pub feed: f64,
    #[serde(rename = "Processing")]
    pub processing: f64,
    #[serde(rename = "Retail")]
    pub retail: f64,
    #[serde(rename = "Transport")]
    pub transport: f64,
}

impl EmissionRecord {
    /// Record with only category, product and total set
    pub fn new(category: &str, product: &str, total: f64) -> Self {
        Self {
            category: category.to_string(),
            product: product.to_string(),
            total,
            farm: 0.0,
            feed: 0.0,
            processing: 0.0,
            retail: 0.0,
            transport: 0.0,
        }
    }

    /// Builder-style setter for one stage value
    pub fn with_stage(mut self, stage: Stage, value: f64) -> Self {
        match stage {
            Stage::Farm => self.farm = value,
            Stage::Feed => self.feed = value,
            Stage::Processing => self.processing = value,
            Stage::Retail => self.retail = value,
            Stage::Transport => self.transport = value,
        }
        self
    }
}

/// Supply chain stage columns, in bar chart series order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Farm,
    Feed,
    Processing,
    Retail,
    Transport,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Farm,
        Stage::Feed,
        Stage::Processing,
        Stage::Retail,
        Stage::Transport,
    ];

    /// Column header in the data file
    pub fn key(self) -> &'static str {
        match self {
            Stage::Farm => "Farm",
            Stage::Feed => "Feed",
            Stage::Processing => "Processing",
            Stage::Retail => "Retail",
            Stage::Transport => "Transport",
        }
    }

    pub fn value(self, record: &EmissionRecord) -> f64 {
        match self {
            Stage::Farm => record.farm,
            Stage::Feed => record.feed,
            Stage::Processing => record.processing,
            Stage::Retail => record.retail,
            Stage::Transport => record.transport,
        }
    }
}

/// Parse records from any CSV source with a header row
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<EmissionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Load records from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<EmissionRecord>> {
    let file = std::fs::File::open(path)?;
    from_csv_reader(file)
}

/// Load records from a JSON array of objects with the CSV field names
pub fn load_json(path: &Path) -> Result<Vec<EmissionRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load by extension: `.json` as JSON, anything else as CSV
pub fn load(path: &Path) -> Result<Vec<EmissionRecord>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_csv(path),
    }
}
