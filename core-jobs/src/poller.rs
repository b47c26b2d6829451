//! # Poller
//!
//! Keeps in-flight jobs fresh without wasting requests once everything
//! has settled.
//!
//! ## Overview
//!
//! The poller owns a recurring timer. On every tick it checks the job
//! store: with no pending/processing jobs it stays idle and issues zero
//! fetches; otherwise it starts one bulk fetch and hands the result to
//! the [`Reconciler`]. Two guards shape the loop:
//!
//! - **No overlap**: an in-flight flag prevents a new tick from starting
//!   a second fetch while one is outstanding. The timer keeps firing; a
//!   hung fetch only delays the next effective fetch, never the ticker.
//! - **Deterministic cancellation**: the owner stops observation through
//!   [`PollerHandle::stop`], and dropping the handle cancels the loop as
//!   well. No fetch starts after cancellation; a fetch already waiting on
//!   the backend is abandoned, though one whose response has already
//!   arrived may still merge its result.
//!
//! Fetch failures are swallowed and logged; the next scheduled tick
//! retries. The poller never raises a user-visible error. Polling is
//! unbounded while any job remains in flight.

use crate::reconciler::Reconciler;
use crate::store::JobStore;
use bridge_traits::backend::VideoBackend;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

/// Periodic backend refresh task for in-flight jobs
pub struct Poller;

/// Owner-side handle for a running poller task
///
/// Dropping the handle cancels the loop; [`stop`](Self::stop) does the
/// same but also waits for it to exit.
pub struct PollerHandle {
    cancel: CancellationToken,
    /// Cancels the token when the handle is dropped without `stop`
    _drop_guard: DropGuard,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Cancels the timer and waits for the poll loop to exit.
    ///
    /// No fetch starts after this returns. A fetch still waiting on the
    /// backend is abandoned; one whose response already arrived may
    /// finish merging it.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Poller {
    /// Spawns the poll loop onto the current runtime.
    pub fn spawn(
        backend: Arc<dyn VideoBackend>,
        store: Arc<JobStore>,
        reconciler: Arc<Reconciler>,
        interval: Duration,
    ) -> PollerHandle {
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            run_poll_loop(backend, store, reconciler, interval, loop_cancel).await;
        });

        PollerHandle {
            _drop_guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }
}

async fn run_poll_loop(
    backend: Arc<dyn VideoBackend>,
    store: Arc<JobStore>,
    reconciler: Arc<Reconciler>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let fetch_outstanding = Arc::new(AtomicBool::new(false));
    info!(interval_ms = interval.as_millis() as u64, "Poller started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Poller stopped");
                break;
            }
            _ = ticker.tick() => {
                if !store.has_in_flight() {
                    // Idle: nothing to refresh, no fetch issued.
                    continue;
                }

                if fetch_outstanding.swap(true, Ordering::SeqCst) {
                    debug!("Skipping tick, previous fetch still outstanding");
                    continue;
                }

                let Some(user_id) = store.user_id() else {
                    debug!("Skipping tick, no user linked");
                    fetch_outstanding.store(false, Ordering::SeqCst);
                    continue;
                };

                // The fetch runs as a subtask so a slow response never
                // stalls the ticker or cancellation.
                let backend = Arc::clone(&backend);
                let reconciler = Arc::clone(&reconciler);
                let guard = Arc::clone(&fetch_outstanding);
                let fetch_cancel = cancel.clone();

                tokio::spawn(async move {
                    tokio::select! {
                        _ = fetch_cancel.cancelled() => {
                            debug!("Fetch abandoned, poller cancelled");
                        }
                        result = backend.get_projects(&user_id) => {
                            match result {
                                Ok(snapshots) => {
                                    let applied = reconciler.apply(&snapshots).await;
                                    debug!(fetched = snapshots.len(), applied, "Poll cycle merged");
                                }
                                Err(e) => {
                                    // Transient failure; the next tick retries.
                                    warn!(error = %e, "Poll fetch failed");
                                }
                            }
                        }
                    }
                    guard.store(false, Ordering::SeqCst);
                });
            }
        }
    }
}
