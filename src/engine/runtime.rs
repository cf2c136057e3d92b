// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::work_item::WorkItem;
use crate::errors::{FleetError, Result};
use crate::exec::ActionInvoker;

use super::core::CoreRuntime;
use super::{CoreCommand, CoreStep, OutcomeRecord, RunEvent};

/// Drives the coordinator core tier by tier and delegates each invocation
/// to an [`ActionInvoker`].
///
/// Every invocation runs on its own Tokio task and reports its record back
/// over a channel; only this loop touches the core.
pub struct Runtime {
    core: CoreRuntime,
    invoker: Arc<dyn ActionInvoker>,
    event_tx: mpsc::Sender<RunEvent>,
    event_rx: mpsc::Receiver<RunEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(core: CoreRuntime, invoker: Arc<dyn ActionInvoker>) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<RunEvent>(64);
        Self {
            core,
            invoker,
            event_tx,
            event_rx,
        }
    }

    /// Run every tier to completion and return one record per work item.
    ///
    /// Order of the returned records is completion order.
    pub async fn run(mut self) -> Result<Vec<OutcomeRecord>> {
        info!("fleetrun runtime started");
        let mut outcomes = Vec::new();

        while let Some(step) = self.core.begin_next_tier() {
            self.apply(step, &mut outcomes);

            while !self.core.tier_settled() {
                // The runtime holds a sender, so `recv` only yields `None`
                // if that invariant is broken.
                let event = self.event_rx.recv().await.ok_or_else(|| {
                    FleetError::Other(anyhow::anyhow!("run event channel closed unexpectedly"))
                })?;

                debug!(?event, "runtime received event");
                let step = self.core.step(event);
                self.apply(step, &mut outcomes);
            }

            debug!(tier = ?self.core.current_tier(), "tier settled");
        }

        outcomes.extend(self.core.finish());

        info!(records = outcomes.len(), "runtime exiting");
        Ok(outcomes)
    }

    fn apply(&self, step: CoreStep, outcomes: &mut Vec<OutcomeRecord>) {
        outcomes.extend(step.outcomes);
        for command in step.commands {
            match command {
                CoreCommand::Invoke(item) => self.dispatch(item),
            }
        }
    }

    /// Spawn one invocation. An invoker that panics, whether while building
    /// its future or while running it, still produces a record, so the tier
    /// can settle.
    fn dispatch(&self, item: WorkItem) {
        let invoker = Arc::clone(&self.invoker);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let invoked = item.clone();
            let invocation = tokio::spawn(async move { invoker.invoke(invoked).await });
            let record = match invocation.await {
                Ok(record) => record,
                Err(err) => {
                    error!(project = %item.project, error = %err, "invocation task failed");
                    OutcomeRecord::failed_to_run(&item, format!("invocation task failed: {err}"))
                }
            };

            if tx.send(RunEvent::Completed(record)).await.is_err() {
                debug!(project = %item.project, "runtime gone before completion was delivered");
            }
        });
    }
}
