use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use fleetrun::dag::WorkItem;
use fleetrun::engine::OutcomeRecord;
use fleetrun::exec::{ActionInvoker, InvokeFuture};

/// Something the fake invoker observed, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationEvent {
    Started(String),
    Finished(String),
}

/// A fake invoker that:
/// - records which projects were invoked, and when they started/finished
/// - sleeps for a configurable per-project delay
/// - reports exit code 1 for projects marked as failing, 0 otherwise.
#[derive(Debug, Default, Clone)]
pub struct FakeInvoker {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    events: Arc<Mutex<Vec<InvocationEvent>>>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, project: &str) -> Self {
        self.failing.insert(project.to_string());
        self
    }

    pub fn delay(mut self, project: &str, millis: u64) -> Self {
        self.delays
            .insert(project.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn events(&self) -> Vec<InvocationEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Projects in the order they were invoked.
    pub fn invoked(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InvocationEvent::Started(p) => Some(p),
                InvocationEvent::Finished(_) => None,
            })
            .collect()
    }

    pub fn invocation_count(&self, project: &str) -> usize {
        self.invoked().iter().filter(|p| p.as_str() == project).count()
    }

    /// Position of an event in the log, for ordering assertions.
    pub fn position(&self, event: &InvocationEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

impl ActionInvoker for FakeInvoker {
    fn invoke(&self, item: WorkItem) -> InvokeFuture {
        let events = Arc::clone(&self.events);
        let fails = self.failing.contains(&item.project);
        let delay = self.delays.get(&item.project).copied();
        debug!(project = %item.project, fails, ?delay, "fake invocation");

        Box::pin(async move {
            events
                .lock()
                .unwrap()
                .push(InvocationEvent::Started(item.project.clone()));

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            events
                .lock()
                .unwrap()
                .push(InvocationEvent::Finished(item.project.clone()));

            let mut record = OutcomeRecord::for_item(&item);
            record.command = vec!["fake".to_string(), item.project.clone()];
            record.stdout = format!("{}\n", item.project);
            record.exit_code = Some(if fails { 1 } else { 0 });
            record
        })
    }
}
