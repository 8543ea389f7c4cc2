//! methanetree - drill-down treemap of food supply chain emissions
//!
//! Aggregates per-product emission records into treemap node sets and drives
//! a one-shot drill-down from food categories to their products.
//!
//! # Levels
//!
//! | Level | Nodes |
//! |-------|-------|
//! | category | `Origin` root plus `Meat`, `vegetable`, `Grain`, `Fruit` |
//! | product | `Origin` root plus every product of the clicked category |
//!
//! # Quick Start
//!
//! ```
//! use methanetree::{Controller, EmissionRecord, NullRenderer, View};
//!
//! let records = vec![
//!     EmissionRecord::new("Meat", "Beef", 30.0),
//!     EmissionRecord::new("Meat", "Lamb", 10.0),
//!     EmissionRecord::new("Fruit", "Apple", 2.0),
//! ];
//!
//! let mut widget = Controller::new(records, NullRenderer);
//! assert_eq!(widget.displayed().get("Meat").unwrap().total, 40.0);
//!
//! widget.click("Meat");
//! assert_eq!(widget.view(), &View::Product("Meat".to_string()));
//! assert!(widget.tooltip_text("Beef").contains("69.28% of the emissions of beef"));
//!
//! // drill-down is one-shot until reset
//! widget.click("Fruit");
//! assert!(!widget.clickable());
//! widget.reset();
//! assert!(widget.clickable());
//! ```

pub mod aggregate;
pub mod category;
pub mod compare;
pub mod config;
pub mod controller;
pub mod error;
pub mod hierarchy;
pub mod output;
pub mod record;
pub mod report;
pub mod serve;
pub mod style;
pub mod tooltip;

pub use aggregate::{build, build_category_summary, build_product_summary, Selector};
pub use category::{FoodCategory, CATEGORIES};
pub use compare::{build_comparison, ComparisonChart};
pub use config::Config;
pub use controller::{update, Cmd, Controller, Model, Msg, RenderPlan, Renderer, SharedController, View};
pub use error::{Error, Result};
pub use hierarchy::{stratify, Hierarchy, HierarchyNode, NodeSet, ROOT_NAME};
pub use output::{JsonRenderer, NullRenderer, TerminalRenderer};
pub use record::{EmissionRecord, Stage};
pub use tooltip::EmissionComparison;
