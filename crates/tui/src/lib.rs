//! # Mocktty TUI
//!
//! Terminal user interface for the business-function testing console: a
//! services sidebar, function tabs, a parameter form, and a result pane that
//! renders the last simulated response as formatted JSON or as a scrollable
//! table with per-cell copy.
//!
//! ## Architecture
//!
//! State updates follow a message/effect split: `App::update` is pure and
//! returns effects, the command layer executes them (clipboard writes,
//! delayed mock executions), and the runtime drives a single event loop over
//! input, ticks, and execution results.

mod app;
mod cmd;
mod runtime;
mod tables;
mod theme;
mod ui;

use anyhow::Result;

pub use app::SharedCtx;

/// Runs the TUI until the user quits.
pub async fn run(ctx: SharedCtx) -> Result<()> {
    runtime::run_app(ctx).await
}
