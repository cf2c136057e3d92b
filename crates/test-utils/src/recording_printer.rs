use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use fleetrun::dag::WorkItem;
use fleetrun::output::{OutputPrinter, OutputSink};
use fleetrun::types::{OutputStream, WorkKey};

/// A line written to a sink: (project, stream, line).
pub type RecordedLine = (String, OutputStream, String);

/// Printer that keeps everything in memory.
///
/// Keys can be pre-registered with [`RecordingPrinter::already_began`] to
/// force duplicate detection.
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    began: Mutex<HashSet<WorkKey>>,
    initialised_with: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
    lines: Arc<Mutex<Vec<RecordedLine>>>,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_began(self, key: WorkKey) -> Self {
        self.began.lock().unwrap().insert(key);
        self
    }

    pub fn initialised_with(&self) -> Vec<String> {
        self.initialised_with.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputPrinter for RecordingPrinter {
    fn init(&self, items: &[WorkItem]) {
        let mut names = self.initialised_with.lock().unwrap();
        names.extend(items.iter().map(|i| i.project.clone()));
    }

    fn began_task(&self, key: &WorkKey) -> bool {
        self.began.lock().unwrap().insert(key.clone())
    }

    fn finished_task(&self, project: &str) {
        self.finished.lock().unwrap().push(project.to_string());
    }

    fn sink_for(&self, project: &str) -> Box<dyn OutputSink> {
        Box::new(RecordingSink {
            project: project.to_string(),
            lines: Arc::clone(&self.lines),
        })
    }
}

struct RecordingSink {
    project: String,
    lines: Arc<Mutex<Vec<RecordedLine>>>,
}

impl OutputSink for RecordingSink {
    fn write_line(&mut self, stream: OutputStream, line: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((self.project.clone(), stream, line.to_string()));
    }
}
