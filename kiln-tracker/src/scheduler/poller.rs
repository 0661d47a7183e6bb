//! Job status poller
//!
//! Queries the status of a single task at a fixed cadence. A failed query is
//! reported and retried on the next tick; only a terminal snapshot or a
//! cancellation ends the loop. Each poll session owns a cancellation token
//! that is checked before every tick and again before a result is delivered,
//! so a response that lands after cancellation is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kiln_client::{ClientError, JobService};
use kiln_core::domain::job::TaskId;
use kiln_core::dto::task::TaskStatus;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one status query, delivered to the session's consumer
#[derive(Debug)]
pub enum PollEvent {
    /// A full snapshot replacing the previous one
    Status(TaskStatus),
    /// A transient failure; polling continues
    Failed(ClientError),
}

/// Consumer's verdict after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep polling
    Continue,
    /// A terminal snapshot was seen, or the consumer asked to stop
    Finished,
    /// The session was cancelled
    Cancelled,
}

type TerminalPredicate = Box<dyn Fn(&TaskStatus) -> bool + Send + Sync>;

/// Handle to a running poll session
///
/// Cloning shares the same session. Cancelling is idempotent and also a
/// no-op once the session has finished on its own.
#[derive(Debug, Clone)]
pub struct PollHandle {
    task_id: TaskId,
    token: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl PollHandle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Stops the session; any in-flight response is discarded
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling status polling for task {}", self.task_id);
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether a terminal snapshot ended the session
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Whether no further queries will be issued
    pub fn is_stopped(&self) -> bool {
        self.is_cancelled() || self.is_finished()
    }
}

/// Polling state for one task
pub struct PollSession<S: ?Sized> {
    service: Arc<S>,
    task_id: TaskId,
    is_terminal: TerminalPredicate,
    token: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl<S: JobService + ?Sized> PollSession<S> {
    /// Creates a session that stops once `is_terminal` holds for a snapshot
    pub fn new<P>(service: Arc<S>, task_id: TaskId, is_terminal: P) -> Self
    where
        P: Fn(&TaskStatus) -> bool + Send + Sync + 'static,
    {
        Self {
            service,
            task_id,
            is_terminal: Box::new(is_terminal),
            token: CancellationToken::new(),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> PollHandle {
        PollHandle {
            task_id: self.task_id.clone(),
            token: self.token.clone(),
            finished: Arc::clone(&self.finished),
        }
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Performs a single status query
    ///
    /// Issues no query once the session has finished or been cancelled, so a
    /// stale caller cannot restart polling for a terminal task.
    pub async fn tick<F>(&self, on_event: &mut F) -> TickOutcome
    where
        F: FnMut(PollEvent) -> PollControl,
    {
        if self.is_finished() {
            return TickOutcome::Finished;
        }
        if self.token.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        debug!("Polling status of task {}", self.task_id);

        let result = tokio::select! {
            _ = self.token.cancelled() => return TickOutcome::Cancelled,
            result = self.service.task_status(&self.task_id) => result,
        };

        if self.token.is_cancelled() {
            debug!("Dropping status of task {} after cancellation", self.task_id);
            return TickOutcome::Cancelled;
        }
        if self.is_finished() {
            return TickOutcome::Finished;
        }

        match result {
            Ok(status) => {
                let terminal = (self.is_terminal)(&status);
                if terminal {
                    self.finish();
                }

                let control = on_event(PollEvent::Status(status));

                if terminal {
                    TickOutcome::Finished
                } else if control == PollControl::Stop {
                    self.finish();
                    TickOutcome::Finished
                } else {
                    TickOutcome::Continue
                }
            }
            Err(e) => {
                warn!("Failed to poll status of task {}: {:#}", self.task_id, e);

                match on_event(PollEvent::Failed(e)) {
                    PollControl::Continue => TickOutcome::Continue,
                    PollControl::Stop => {
                        self.finish();
                        TickOutcome::Finished
                    }
                }
            }
        }
    }

    /// Runs the polling loop until the session finishes or is cancelled
    ///
    /// The first query is issued one interval after the loop starts.
    pub async fn run<F>(self, interval: Duration, mut on_event: F)
    where
        F: FnMut(PollEvent) -> PollControl,
    {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    debug!("Status polling for task {} cancelled", self.task_id);
                    return;
                }
                _ = ticker.tick() => {}
            }

            match self.tick(&mut on_event).await {
                TickOutcome::Continue => continue,
                TickOutcome::Finished => {
                    info!("Stopped polling task {}", self.task_id);
                    return;
                }
                TickOutcome::Cancelled => {
                    debug!("Status polling for task {} cancelled", self.task_id);
                    return;
                }
            }
        }
    }
}

/// Spawns poll sessions against a job service at a fixed cadence
pub struct StatusPoller<S: ?Sized> {
    service: Arc<S>,
    interval: Duration,
}

impl<S: JobService + ?Sized + 'static> StatusPoller<S> {
    /// Creates a new status poller
    pub fn new(service: Arc<S>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Starts polling until the task reports `completed` or `failed`
    pub fn spawn<F>(&self, task_id: TaskId, on_event: F) -> PollHandle
    where
        F: FnMut(PollEvent) -> PollControl + Send + 'static,
    {
        self.spawn_until(task_id, TaskStatus::is_terminal, on_event)
    }

    /// Starts polling until `is_terminal` holds for a snapshot
    pub fn spawn_until<P, F>(&self, task_id: TaskId, is_terminal: P, on_event: F) -> PollHandle
    where
        P: Fn(&TaskStatus) -> bool + Send + Sync + 'static,
        F: FnMut(PollEvent) -> PollControl + Send + 'static,
    {
        let session = PollSession::new(Arc::clone(&self.service), task_id, is_terminal);
        let handle = session.handle();

        info!(
            "Starting status polling for task {} (interval: {:?})",
            handle.task_id(),
            self.interval
        );
        tokio::spawn(session.run(self.interval, on_event));

        handle
    }
}
