//! Polling watcher for a single job id.
//!
//! Fetches the job once immediately, then polls on a fixed interval until a
//! terminal status is observed. Re-watching a different id or stopping the
//! watch invalidates the previous poll loop; results from an invalidated
//! loop are discarded so late responses can never overwrite newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::runner::JobRunner;
use crate::types::Job;

/// Observable state of a watched job.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    pub job: Option<Job>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Watches one job id at a time against an external [`JobRunner`].
///
/// State is published through a `tokio::sync::watch` channel; callers
/// subscribe once and observe every update. The watcher never panics past
/// its boundary: every outcome, including transport failure, resolves to a
/// `WatchState`.
pub struct JobWatcher {
    runner: Arc<dyn JobRunner>,
    poll_interval: Duration,
    tx: watch::Sender<WatchState>,
    /// Bumped on every watch/stop; poll loops carry the value they were
    /// started with and discard their results once it moves on.
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl JobWatcher {
    /// Create a watcher polling at `poll_interval` (default 1s via
    /// `jobs.poll_interval_secs` in the config).
    pub fn new(runner: Arc<dyn JobRunner>, poll_interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(WatchState::default());
        Self {
            runner,
            poll_interval,
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.tx.subscribe()
    }

    /// Current observable state.
    pub fn state(&self) -> WatchState {
        self.tx.borrow().clone()
    }

    /// Start watching `id`, replacing any previous watch.
    ///
    /// `watch(None)` resets to idle state (no job, not loading, no error)
    /// without issuing any fetch.
    pub fn watch(&self, id: Option<Uuid>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_task();

        let Some(id) = id else {
            self.tx.send_replace(WatchState::default());
            return;
        };

        self.tx.send_replace(WatchState {
            job: None,
            is_loading: true,
            error: None,
        });

        let runner = Arc::clone(&self.runner);
        let tx = self.tx.clone();
        let gen_counter = Arc::clone(&self.generation);
        let interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            debug!(job_id = %id, "Watch started");
            loop {
                let fetched = runner.fetch(id).await;

                // An in-flight fetch may outlive the watch that issued it.
                if gen_counter.load(Ordering::SeqCst) != generation {
                    debug!(job_id = %id, "Discarding result for superseded watch");
                    return;
                }

                match fetched {
                    Ok(job) => {
                        let terminal = job.status.is_terminal();
                        let job = Self::clamp_progress(&tx, job);
                        tx.send_replace(WatchState {
                            job: Some(job),
                            is_loading: false,
                            error: None,
                        });
                        if terminal {
                            debug!(job_id = %id, "Job reached terminal status, watch complete");
                            return;
                        }
                    }
                    Err(e) => {
                        // A failed fetch is attributed to the job itself;
                        // the caller must re-initiate the watch to retry.
                        warn!(job_id = %id, error = %e, "Job fetch failed, stopping watch");
                        tx.send_replace(WatchState {
                            job: None,
                            is_loading: false,
                            error: Some(e.to_string()),
                        });
                        return;
                    }
                }

                tokio::time::sleep(interval).await;
            }
        });

        *self.task.lock().unwrap() = Some(handle);
    }

    /// Stop watching. Future polls are cancelled immediately; an in-flight
    /// fetch may complete but its result is discarded.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_task();
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Keep displayed progress monotonic for a non-terminal job. A lower
    /// value than previously observed is an anomaly from the runner, not a
    /// crash: log it and keep the higher value.
    fn clamp_progress(tx: &watch::Sender<WatchState>, mut job: Job) -> Job {
        if let Some(prev) = tx.borrow().job.as_ref() {
            if prev.id == job.id && !job.status.is_terminal() && job.progress < prev.progress {
                warn!(
                    job_id = %job.id,
                    prev = prev.progress,
                    reported = job.progress,
                    "Job progress regressed; keeping higher value"
                );
                job.progress = prev.progress;
            }
        }
        job
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}
