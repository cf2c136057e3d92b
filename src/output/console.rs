// src/output/console.rs

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::dag::WorkItem;
use crate::output::{NullSink, OutputPrinter, OutputSink};
use crate::types::{OutputStream, WorkKey};

/// Terminal printer.
///
/// Streams every output line as `<project> | <line>` (stderr lines go to
/// stderr) and keeps the registry of keys that began in this run.
#[derive(Debug, Default)]
pub struct ConsolePrinter {
    quiet: bool,
    /// Width of the project column, from the longest project name.
    width: AtomicUsize,
    began: Mutex<HashSet<WorkKey>>,
}

impl ConsolePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Printer that keeps the registry but does not stream output.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }
}

impl OutputPrinter for ConsolePrinter {
    fn init(&self, items: &[WorkItem]) {
        let width = items.iter().map(|i| i.project.len()).max().unwrap_or(0);
        self.width.store(width, Ordering::Relaxed);
        debug!(items = items.len(), "printer initialised");
    }

    fn began_task(&self, key: &WorkKey) -> bool {
        self.began
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone())
    }

    fn finished_task(&self, project: &str) {
        info!(project, "finished");
    }

    fn sink_for(&self, project: &str) -> Box<dyn OutputSink> {
        if self.quiet {
            return Box::new(NullSink);
        }
        Box::new(ConsoleSink {
            prefix: format!(
                "{:width$} |",
                project,
                width = self.width.load(Ordering::Relaxed)
            ),
        })
    }
}

struct ConsoleSink {
    prefix: String,
}

impl OutputSink for ConsoleSink {
    fn write_line(&mut self, stream: OutputStream, line: &str) {
        match stream {
            OutputStream::Stdout => println!("{} {}", self.prefix, line),
            OutputStream::Stderr => eprintln!("{} {}", self.prefix, line),
        }
    }
}
