//! Background organize runs.
//!
//! An [`Organizer`] runs at most one pipeline at a time on a dedicated
//! thread. Progress flows back over a crossbeam channel; cancellation is a
//! shared flag the pipeline polls between files.

use crate::file_organizer::{
    OrganizeError, OrganizeRequest, OrganizeResult, OrganizingPipeline, RunState, RunStatistics,
};
use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::info;

/// Cooperative stop request shared between a run and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop before its next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress updates sent from the organizer thread.
#[derive(Debug, Clone, PartialEq)]
pub enum OrganizeProgress {
    /// The source tree has been walked.
    Scanned { total_files: usize, folders: usize },
    /// A file has been handled (successfully or not). `index` is 1-based.
    File {
        index: usize,
        total: usize,
        name: String,
    },
    /// A file could not be organized.
    FileFailed { path: PathBuf, message: String },
    /// The run ended, either completed or stopped.
    Finished {
        state: RunState,
        processed: usize,
        total: usize,
    },
}

/// Starts organize runs and keeps them exclusive.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the worker exits, panics included.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Organizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run started by this organizer is still active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start a run on a background thread.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::AlreadyRunning` while a previous run is
    /// active, or `OrganizeError::Worker` if the thread cannot be spawned.
    pub fn start(
        &self,
        pipeline: OrganizingPipeline,
        request: OrganizeRequest,
    ) -> OrganizeResult<OrganizeHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(OrganizeError::AlreadyRunning);
        }
        let guard = RunningGuard(self.running.clone());

        let (progress_tx, progress_rx) = crossbeam_channel::unbounded::<OrganizeProgress>();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name("magicsort-organizer".into())
            .spawn(move || {
                info!("organizer thread started");
                let result = pipeline.run(&request, &worker_cancel, &mut |event| {
                    let _ = progress_tx.send(event);
                });
                drop(guard);

                if let Ok(stats) = &result {
                    let _ = progress_tx.send(OrganizeProgress::Finished {
                        state: stats.state,
                        processed: stats.processed,
                        total: stats.total_files,
                    });
                }
                result
            })
            .map_err(|e| OrganizeError::Worker(e.to_string()))?;

        Ok(OrganizeHandle {
            progress_rx,
            cancel,
            thread,
        })
    }
}

/// Handle to a running or finished organize run.
pub struct OrganizeHandle {
    /// Receiver for progress updates from the organizer thread.
    pub progress_rx: Receiver<OrganizeProgress>,
    cancel: CancellationToken,
    thread: thread::JoinHandle<OrganizeResult<RunStatistics>>,
}

impl OrganizeHandle {
    /// Request the run to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the run to end and take its statistics.
    pub fn join(self) -> OrganizeResult<RunStatistics> {
        self.thread
            .join()
            .map_err(|_| OrganizeError::Worker("organizer thread panicked".to_string()))?
    }
}
