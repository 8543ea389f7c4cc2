//! View-state controller for the drill-down treemap
//!
//! Functional core in `update` (pure transitions over a `Model` value), a thin
//! imperative shell here: `Controller` owns the records and the current model,
//! feeds messages through `update`, and carries out the resulting commands
//! against a `Renderer`.
//!
//! Access is serialized by `&mut self`. Hosts that dispatch events from
//! several threads share a controller through `SharedController`.

pub mod msg; // what happened in the host page
pub mod render; // keyed enter/update/exit render plans
pub mod update; // pure transitions

use std::sync::{Arc, Mutex};

use crate::compare::ComparisonChart;
use crate::hierarchy::NodeSet;
use crate::record::EmissionRecord;
use crate::tooltip::EmissionComparison;

pub use msg::{parse_event, HostEvent, Msg};
pub use render::RenderPlan;
pub use update::{update, Cmd, Model, View};

/// The drawing side of the widget
pub trait Renderer {
    /// Replace the displayed tiles
    fn render(&mut self, plan: &RenderPlan);

    fn highlight(&mut self, _name: &str, _tooltip: Option<&EmissionComparison>) {}

    fn clear_highlight(&mut self) {}

    fn render_comparison(&mut self, _chart: &ComparisonChart) {}

    fn clear_comparison(&mut self) {}
}

/// Widget instance: records, current model, renderer
pub struct Controller<R: Renderer> {
    records: Vec<EmissionRecord>,
    model: Model,
    renderer: R,
}

/// Controller shared between event sources
pub type SharedController<R> = Arc<Mutex<Controller<R>>>;

impl<R: Renderer> Controller<R> {
    /// Build the category view and render it
    pub fn new(records: Vec<EmissionRecord>, renderer: R) -> Self {
        let (model, cmd) = Model::init(&records);
        let mut controller = Self {
            records,
            model,
            renderer,
        };
        controller.execute(cmd);
        controller
    }

    pub fn into_shared(self) -> SharedController<R> {
        Arc::new(Mutex::new(self))
    }

    /// Run one message through `update` and perform its commands
    pub fn dispatch(&mut self, msg: Msg) {
        tracing::debug!(?msg, "dispatch");
        let model = std::mem::take(&mut self.model);
        let (model, cmd) = update(msg, model, &self.records);
        self.model = model;
        self.execute(cmd);
    }

    pub fn click(&mut self, name: &str) {
        self.dispatch(Msg::Click(name.to_string()));
    }

    pub fn hover(&mut self, name: &str) {
        self.dispatch(Msg::Hover(name.to_string()));
    }

    pub fn unhover(&mut self) {
        self.dispatch(Msg::Unhover);
    }

    pub fn compare(&mut self, product: &str) {
        self.dispatch(Msg::Compare(product.to_string()));
    }

    pub fn reset(&mut self) {
        self.dispatch(Msg::Reset);
    }

    /// Swap the record set. The display is untouched until the next reset.
    pub fn set_records(&mut self, records: Vec<EmissionRecord>) {
        tracing::info!(count = records.len(), "records replaced");
        self.records = records;
    }

    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn view(&self) -> &View {
        &self.model.view
    }

    pub fn clickable(&self) -> bool {
        self.model.clickable
    }

    pub fn displayed(&self) -> &NodeSet {
        &self.model.displayed
    }

    /// Empty at category level
    pub fn tooltip_text(&self, name: &str) -> String {
        self.model.tooltip_text(name)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn execute(&mut self, cmd: Cmd) {
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::None | Cmd::Batch(_) => {}
                Cmd::Render(plan) => {
                    tracing::info!(
                        view = ?self.model.view,
                        nodes = plan.nodes.len(),
                        enter = plan.enter.len(),
                        exit = plan.exit.len(),
                        "render"
                    );
                    self.renderer.render(&plan);
                }
                Cmd::Highlight { name, tooltip } => {
                    self.renderer.highlight(&name, tooltip.as_ref());
                }
                Cmd::ClearHighlight => self.renderer.clear_highlight(),
                Cmd::RenderComparison(chart) => {
                    tracing::info!(product = %chart.product, groups = chart.groups.len(), "comparison");
                    self.renderer.render_comparison(&chart);
                }
                Cmd::ClearComparison => self.renderer.clear_comparison(),
                Cmd::Ignored(reason) => tracing::warn!(%reason, "event ignored"),
                Cmd::BuildFailed(reason) => {
                    tracing::error!(%reason, "node set build failed, keeping current display")
                }
            }
        }
    }
}
