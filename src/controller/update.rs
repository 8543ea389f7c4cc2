//! Pure update function for the drill-down widget
//!
//! ```text
//! update : Msg -> Model -> Records -> (Model, Cmd)
//! ```
//!
//! The model is a value: every transition returns a new one together with
//! the commands the shell must carry out (render, tooltip, comparison chart,
//! report a problem). Nothing here draws or logs.

use super::msg::Msg;
use super::render::RenderPlan;
use crate::aggregate::{build_category_summary, build_product_summary};
use crate::category::FoodCategory;
use crate::compare::{build_comparison, ComparisonChart};
use crate::error::Error;
use crate::hierarchy::NodeSet;
use crate::record::EmissionRecord;
use crate::tooltip::{self, EmissionComparison};
use serde::Serialize;

/// Which level is displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "category", rename_all = "lowercase")]
pub enum View {
    Category,
    Product(String),
}

/// Commands for the imperative shell
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    None,
    Batch(Vec<Cmd>),
    /// Replace the displayed tiles
    Render(RenderPlan),
    /// Emphasise a tile; the tooltip is only present at product level
    Highlight {
        name: String,
        tooltip: Option<EmissionComparison>,
    },
    ClearHighlight,
    RenderComparison(ComparisonChart),
    ClearComparison,
    /// The event was dropped (unknown target); the widget is unchanged
    Ignored(String),
    /// A node set failed to build; the previous display stays
    BuildFailed(String),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Cmd {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.pop().unwrap_or(Cmd::None),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Flatten nested batches into execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    fn from_error(err: Error) -> Cmd {
        if err.is_ignorable() {
            Cmd::Ignored(err.to_string())
        } else {
            Cmd::BuildFailed(err.to_string())
        }
    }
}

/// Widget state
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub view: View,
    /// Cleared by the one drill-down, restored by reset
    pub clickable: bool,
    /// Node set currently on screen
    pub displayed: NodeSet,
    pub hovered: Option<String>,
    /// Product whose comparison chart is shown
    pub comparison: Option<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            view: View::Category,
            clickable: true,
            displayed: NodeSet::default(),
            hovered: None,
            comparison: None,
        }
    }
}

impl Model {
    /// Category view over `records`, with the first render
    pub fn init(records: &[EmissionRecord]) -> (Model, Cmd) {
        let displayed = build_category_summary(records);
        let plan = RenderPlan::initial(displayed.clone());
        (
            Model {
                displayed,
                ..Default::default()
            },
            Cmd::Render(plan),
        )
    }

    pub fn selected_category(&self) -> Option<&str> {
        match &self.view {
            View::Category => None,
            View::Product(c) => Some(c),
        }
    }

    /// Tooltip text for a displayed node; empty at category level
    pub fn tooltip_text(&self, name: &str) -> String {
        self.tooltip_for(name).map(|c| c.text()).unwrap_or_default()
    }

    fn tooltip_for(&self, name: &str) -> Option<EmissionComparison> {
        match self.view {
            View::Category => None,
            View::Product(_) => self
                .displayed
                .get(name)
                .filter(|n| !n.is_root())
                .map(tooltip::compare),
        }
    }
}

/// Process one message
pub fn update(msg: Msg, model: Model, records: &[EmissionRecord]) -> (Model, Cmd) {
    match msg {
        Msg::Noop => (model, Cmd::None),

        Msg::Click(name) => {
            if !model.clickable || model.view != View::Category {
                return (model, Cmd::None);
            }
            if FoodCategory::from_name(&name).is_none() {
                return (model, Cmd::from_error(Error::UnknownCategoryClick(name)));
            }
            match build_product_summary(records, &name) {
                Ok(products) => {
                    let plan = RenderPlan::between(&model.displayed, products.clone());
                    (
                        Model {
                            view: View::Product(name),
                            clickable: false,
                            displayed: products,
                            hovered: None,
                            ..model
                        },
                        Cmd::Render(plan),
                    )
                }
                Err(err) => (model, Cmd::from_error(err)),
            }
        }

        Msg::Hover(name) => {
            if model.displayed.get(&name).is_none() {
                return (model, Cmd::None);
            }
            let tooltip = model.tooltip_for(&name);
            (
                Model {
                    hovered: Some(name.clone()),
                    ..model
                },
                Cmd::Highlight { name, tooltip },
            )
        }

        Msg::Unhover => {
            let cmd = if model.hovered.is_some() {
                Cmd::ClearHighlight
            } else {
                Cmd::None
            };
            (
                Model {
                    hovered: None,
                    ..model
                },
                cmd,
            )
        }

        Msg::Compare(product) => {
            let Some(category) = model.selected_category().map(str::to_string) else {
                return (model, Cmd::None);
            };
            let in_category = records
                .iter()
                .any(|r| r.category == category && r.product == product);
            if !in_category {
                return (model, Cmd::from_error(Error::UnknownProduct(product)));
            }
            match build_comparison(records, &product) {
                Ok(chart) => (
                    Model {
                        comparison: Some(product),
                        ..model
                    },
                    Cmd::RenderComparison(chart),
                ),
                Err(err) => (model, Cmd::from_error(err)),
            }
        }

        Msg::Reset => {
            let displayed = build_category_summary(records);
            let plan = RenderPlan::between(&model.displayed, displayed.clone());
            let cmd = Cmd::batch(vec![
                if model.hovered.is_some() {
                    Cmd::ClearHighlight
                } else {
                    Cmd::None
                },
                if model.comparison.is_some() {
                    Cmd::ClearComparison
                } else {
                    Cmd::None
                },
                Cmd::Render(plan),
            ]);
            (
                Model {
                    displayed,
                    ..Default::default()
                },
                cmd,
            )
        }
    }
}
