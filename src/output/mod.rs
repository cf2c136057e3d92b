// src/output/mod.rs

//! Presentation layer.
//!
//! - [`OutputPrinter`] is what the engine and invoker talk to: it doubles
//!   as the per-run dedup registry (`began_task`) and hands out sinks for
//!   streamed command output.
//! - [`console`] is the terminal implementation.
//! - [`report`] renders the final summary of a run.

pub mod console;
pub mod report;

use crate::dag::WorkItem;
use crate::types::{OutputStream, WorkKey};

pub use console::ConsolePrinter;
pub use report::{RunSummary, render_report};

/// Destination for the output of one project's command.
pub trait OutputSink: Send {
    fn write_line(&mut self, stream: OutputStream, line: &str);
}

pub trait OutputPrinter: Send + Sync {
    /// Called once with every work item before the run starts.
    fn init(&self, items: &[WorkItem]);

    /// Register that `key` is starting. Returns `false` if it already
    /// began in this run; the caller must then not run it again.
    fn began_task(&self, key: &WorkKey) -> bool;

    fn finished_task(&self, project: &str);

    fn sink_for(&self, project: &str) -> Box<dyn OutputSink>;
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_line(&mut self, _stream: OutputStream, _line: &str) {}
}
