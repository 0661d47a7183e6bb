//! Job lifecycle orchestrator
//!
//! Owns the single job slot: `Idle -> Queued -> Processing -> Completed | Failed`,
//! and back to `Idle` only through `reset`. Every mutation happens under one
//! lock and is published as an `OrchestratorView` snapshot.
//!
//! Each submission and each reset bumps an epoch. A poll result is applied
//! only if its epoch and task ID still match the slot, so late responses can
//! never resurrect a job that was reset or already reached a terminal state.

mod view;

pub use view::{OrchestratorView, Phase};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kiln_client::{GenerationClient, JobService};
use kiln_core::domain::job::{Job, TaskId};
use kiln_core::domain::upload::ImageUpload;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SubmitError;
use crate::scheduler::{PollControl, PollEvent, PollHandle, StatusPoller};
use crate::service::SubmissionGateway;

struct Slot {
    view: OrchestratorView,
    poll: Option<PollHandle>,
    epoch: u64,
}

struct Shared {
    slot: Mutex<Slot>,
    view_tx: watch::Sender<OrchestratorView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, slot: &Slot) {
        self.view_tx.send_replace(slot.view.clone());
    }

    /// Folds one poll outcome into the slot, if it still belongs there
    fn apply_poll_event(&self, epoch: u64, task_id: &TaskId, event: PollEvent) -> PollControl {
        let mut slot = self.lock();

        if slot.epoch != epoch {
            debug!("Discarding stale poll result for task {}", task_id);
            return PollControl::Stop;
        }

        let Some(job) = slot.view.job.as_mut() else {
            return PollControl::Stop;
        };
        if job.id != *task_id || job.is_terminal() {
            debug!("Discarding poll result for inactive task {}", task_id);
            return PollControl::Stop;
        }

        match event {
            PollEvent::Status(status) => {
                let previous = job.state;
                if !job.apply(&status) {
                    warn!(
                        "Ignoring status for task {} while tracking {}",
                        status.task_id, task_id
                    );
                    return PollControl::Continue;
                }

                let state = job.state;
                debug!(
                    "Task {}: {} {}% ({})",
                    task_id, state, job.progress, job.current_step
                );
                if state != previous {
                    info!("Task {} moved from {} to {}", task_id, previous, state);
                }

                slot.view.poll_failures = 0;
                slot.view.last_poll_error = None;
                self.publish(&slot);

                if state.is_terminal() {
                    PollControl::Stop
                } else {
                    PollControl::Continue
                }
            }
            PollEvent::Failed(e) => {
                slot.view.poll_failures = slot.view.poll_failures.saturating_add(1);
                slot.view.last_poll_error = Some(e.to_string());
                self.publish(&slot);

                PollControl::Continue
            }
        }
    }
}

/// Clears `submitting` if a submission future is dropped before it resolves
struct PendingSubmission<'a> {
    shared: &'a Shared,
    epoch: u64,
    armed: bool,
}

impl PendingSubmission<'_> {
    fn defuse(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut slot = self.shared.lock();
        if slot.epoch != self.epoch || !slot.view.submitting {
            return;
        }

        info!("Submission abandoned before the service answered");
        slot.epoch += 1;
        slot.view.submitting = false;
        self.shared.publish(&slot);
    }
}

/// Tracks at most one remote job at a time
///
/// Dropping the orchestrator cancels any polling it started.
pub struct JobOrchestrator<S: ?Sized = dyn JobService> {
    gateway: SubmissionGateway<S>,
    poller: StatusPoller<S>,
    shared: Arc<Shared>,
}

impl JobOrchestrator<GenerationClient> {
    /// Creates an orchestrator talking HTTP to the configured service
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let client = Arc::new(config.client()?);

        Ok(Self::new(client, config.poll_interval))
    }
}

impl<S: JobService + ?Sized + 'static> JobOrchestrator<S> {
    /// Creates an idle orchestrator
    pub fn new(service: Arc<S>, poll_interval: Duration) -> Self {
        let (view_tx, _) = watch::channel(OrchestratorView::default());

        Self {
            gateway: SubmissionGateway::new(Arc::clone(&service)),
            poller: StatusPoller::new(service, poll_interval),
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    view: OrchestratorView::default(),
                    poll: None,
                    epoch: 0,
                }),
                view_tx,
            }),
        }
    }

    /// Current snapshot
    pub fn view(&self) -> OrchestratorView {
        self.shared.view_tx.borrow().clone()
    }

    /// Receiver notified on every published change
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorView> {
        self.shared.view_tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.shared.view_tx.borrow().phase()
    }

    pub fn job(&self) -> Option<Job> {
        self.shared.view_tx.borrow().job.clone()
    }

    /// Handle of the poller for the current job, if one was started
    pub fn poll_handle(&self) -> Option<PollHandle> {
        self.shared.lock().poll.clone()
    }

    /// Whether status queries are still being issued
    pub fn is_polling(&self) -> bool {
        self.shared
            .lock()
            .poll
            .as_ref()
            .is_some_and(|handle| !handle.is_stopped())
    }

    /// Submits an image and starts tracking the resulting job
    ///
    /// Only allowed from `Idle` with an image present. On success the job
    /// starts `Queued` at 0% whatever the service's receipt says, and polling
    /// begins. On a service failure the orchestrator stays `Idle` and the
    /// message is published as the view's `error`. Dropping the returned
    /// future before it resolves leaves the orchestrator `Idle`.
    pub async fn submit(&self, upload: Option<&ImageUpload>) -> Result<TaskId, SubmitError> {
        let epoch = {
            let mut slot = self.shared.lock();

            SubmissionGateway::<S>::require_input(upload)?;
            if slot.view.submitting {
                return Err(SubmitError::SubmissionPending);
            }
            match slot.view.job.as_ref() {
                Some(job) if job.is_terminal() => return Err(SubmitError::ResetRequired),
                Some(_) => return Err(SubmitError::JobActive),
                None => {}
            }

            slot.epoch += 1;
            slot.view.submitting = true;
            slot.view.error = None;
            self.shared.publish(&slot);
            slot.epoch
        };

        let mut pending = PendingSubmission {
            shared: &self.shared,
            epoch,
            armed: true,
        };
        let result = self.gateway.submit(upload).await;
        pending.defuse();

        let mut slot = self.shared.lock();
        if slot.epoch != epoch {
            if let Ok(receipt) = &result {
                info!(
                    "Dropping task {} accepted after a reset",
                    receipt.task_id
                );
            }
            return Err(SubmitError::Superseded);
        }

        slot.view.submitting = false;

        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => {
                slot.view.error = Some(e.to_string());
                self.shared.publish(&slot);
                return Err(e);
            }
        };

        let task_id = receipt.task_id;
        debug!(
            "Service reported '{}' for new task {}: {}",
            receipt.status, task_id, receipt.message
        );

        slot.view.job = Some(Job::queued(task_id.clone()));
        slot.view.poll_failures = 0;
        slot.view.last_poll_error = None;

        let shared = Arc::downgrade(&self.shared);
        let polled = task_id.clone();
        let handle = self.poller.spawn(task_id.clone(), move |event| {
            match shared.upgrade() {
                Some(shared) => shared.apply_poll_event(epoch, &polled, event),
                None => PollControl::Stop,
            }
        });
        slot.poll = Some(handle);

        self.shared.publish(&slot);
        info!("Tracking task {}", task_id);

        Ok(task_id)
    }

    /// Discards the job and cancels its polling; always succeeds
    ///
    /// Also clears the submission error and aborts the effect of any
    /// submission still in flight.
    pub fn reset(&self) {
        let mut slot = self.shared.lock();

        slot.epoch += 1;
        if let Some(handle) = slot.poll.take() {
            handle.cancel();
        }

        if slot.view == OrchestratorView::default() {
            debug!("Reset requested while idle");
            return;
        }

        match slot.view.job.as_ref() {
            Some(job) => info!("Resetting; discarding task {} ({})", job.id, job.state),
            None => info!("Resetting"),
        }

        slot.view = OrchestratorView::default();
        self.shared.publish(&slot);
    }
}

impl<S: ?Sized> Drop for JobOrchestrator<S> {
    fn drop(&mut self) {
        let mut slot = self.shared.lock();
        slot.epoch += 1;
        if let Some(handle) = slot.poll.take() {
            handle.cancel();
        }
    }
}
