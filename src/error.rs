//! Error type for methanetree operations

use thiserror::Error;

/// Everything that can go wrong between loading records and handing a node
/// set to the renderer.
#[derive(Debug, Error)]
pub enum Error {
    /// Two nodes in one node set share a name
    #[error("duplicate node name: {0}")]
    DuplicateNodeName(String),

    /// A node points at a parent that is not in the node set
    #[error("node {node:?} references missing parent {parent:?}")]
    MissingParent { node: String, parent: String },

    /// No node with an empty parent
    #[error("node set has no root")]
    MissingRoot,

    /// More than one node with an empty parent
    #[error("node set has multiple roots: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    /// A click at category level named something outside the fixed categories
    #[error("unknown category: {0}")]
    UnknownCategoryClick(String),

    /// A comparison was requested for a product with no record
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error leaves the widget usable (the event is simply dropped)
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Error::UnknownCategoryClick(_) | Error::UnknownProduct(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
