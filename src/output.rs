//! Terminal renderers used by the CLI
//!
//! `TerminalRenderer` prints each render request as a table with a share bar
//! and the tile colour the viewer would use. `JsonRenderer` prints the node
//! set the viewer would receive.

use crate::compare::ComparisonChart;
use crate::config::ChartConfig;
use crate::controller::{RenderPlan, Renderer};
use crate::hierarchy::stratify;
use crate::style;
use crate::tooltip::EmissionComparison;
use colored::Colorize;
use std::io::Write;

const BAR_WIDTH: usize = 30;

/// Human readable tables on any writer
pub struct TerminalRenderer<W: Write> {
    out: W,
    chart: ChartConfig,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, chart: ChartConfig) -> Self {
        Self { out, chart }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_plan(&mut self, plan: &RenderPlan) -> std::io::Result<()> {
        let tree = stratify(&plan.nodes).map_err(|e| std::io::Error::other(e.to_string()))?;
        let leaves = tree.leaves();
        let max = tree.max_leaf_total();
        let sum = tree.value();

        if leaves.iter().all(|n| n.name == tree.root().name) {
            writeln!(self.out, "{}", "(no products)".dimmed())?;
            return Ok(());
        }

        for node in leaves {
            let filled = if max > 0.0 {
                ((node.total / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let share = if sum > 0.0 { node.total * 100.0 / sum } else { 0.0 };
            let fill = style::tile_fill(&self.chart, node.total, max);
            let (r, g, b) = style::parse_hex(&fill).unwrap_or((0, 0, 0));
            writeln!(
                self.out,
                "{:<34} {:>9.2}  {:>6.2}%  {}",
                truncate(&node.name, 34),
                node.total,
                share,
                "█".repeat(filled).truecolor(r, g, b)
            )?;
        }
        writeln!(self.out, "{:<34} {:>9.2}", "Total".bold(), sum)
    }

    fn write_comparison(&mut self, chart: &ComparisonChart) -> std::io::Result<()> {
        writeln!(self.out, "{}", format!("Compared with beef: {}", chart.product).bold())?;
        for group in &chart.groups {
            writeln!(self.out, "  {}", group.product)?;
            for (i, bar) in group.bars.iter().enumerate() {
                let filled = if chart.max_value > 0.0 {
                    ((bar.value / chart.max_value) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                let (r, g, b) = style::parse_hex(style::stage_color(i)).unwrap_or((0, 0, 0));
                writeln!(
                    self.out,
                    "    {:<11} {:>7.2}  {}",
                    bar.key.key(),
                    bar.value,
                    "█".repeat(filled).truecolor(r, g, b)
                )?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, plan: &RenderPlan) {
        if let Err(e) = self.write_plan(plan) {
            tracing::error!(error = %e, "failed to write table");
        }
    }

    fn highlight(&mut self, name: &str, tooltip: Option<&EmissionComparison>) {
        let result = match tooltip {
            Some(t) => writeln!(self.out, "{}", t.text()),
            None => writeln!(self.out, "{}", name),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to write tooltip");
        }
    }

    fn render_comparison(&mut self, chart: &ComparisonChart) {
        if let Err(e) = self.write_comparison(chart) {
            tracing::error!(error = %e, "failed to write comparison");
        }
    }
}

/// Prints every render request as a JSON node set, one per line
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: serde::Serialize>(&mut self, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(self.out, "{}", json));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to write JSON");
        }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, plan: &RenderPlan) {
        self.emit(&plan.nodes);
    }

    fn highlight(&mut self, _name: &str, tooltip: Option<&EmissionComparison>) {
        if let Some(t) = tooltip {
            self.emit(t);
        }
    }

    fn render_comparison(&mut self, chart: &ComparisonChart) {
        self.emit(chart);
    }
}

/// Renderer that draws nothing, for callers that only need the state
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _plan: &RenderPlan) {}
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
