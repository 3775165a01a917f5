use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use tracing::{debug, error};

use worldpreview_core::{LayerSampler, PreviewGrid, PreviewSettings};

use crate::buffer::PixelBuffer;
use crate::cancel::TaskCancel;
use crate::error::PipelineError;
use crate::generator::{generate, Generated};

/// Opaque identity of one submitted unit of preview work.
///
/// At most one handle is current at a time; submitting again makes the
/// previous handle stale immediately, before the worker has observed
/// the cancellation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Terminal result of one task. Produced exactly once per started task
/// and surfaced at most once, only while its handle is still current.
#[derive(Debug)]
pub enum TaskOutcome {
    Success(PixelBuffer),
    Failure(PipelineError),
    Cancelled,
}

struct TaskRequest {
    handle: TaskHandle,
    grid: PreviewGrid,
    settings: PreviewSettings,
}

struct TaskResponse {
    handle: TaskHandle,
    outcome: TaskOutcome,
}

/// Owns the single in-flight preview task and the worker thread that
/// runs it.
///
/// `submit` replaces the active task: the previous one is cooperatively
/// cancelled and its outcome, whatever it turns out to be, is dropped by
/// `poll`. The coordinator never deduplicates — equal back-to-back
/// requests are a session-policy concern.
pub struct TaskCoordinator {
    tx_request: mpsc::Sender<TaskRequest>,
    rx_response: mpsc::Receiver<TaskResponse>,
    cancel: Arc<TaskCancel>,
    current: u64,
}

impl TaskCoordinator {
    /// Spawn the worker thread and return the control-loop handle.
    pub fn spawn<S>(sampler: Arc<S>) -> Self
    where
        S: LayerSampler + Send + Sync + 'static,
    {
        let (tx_request, rx_request) = mpsc::channel::<TaskRequest>();
        let (tx_response, rx_response) = mpsc::channel::<TaskResponse>();
        let cancel = Arc::new(TaskCancel::new());

        let worker_cancel = Arc::clone(&cancel);
        thread::Builder::new()
            .name("preview-worker".into())
            .spawn(move || task_worker(sampler, rx_request, tx_response, worker_cancel))
            .expect("Failed to spawn preview worker thread");

        Self {
            tx_request,
            rx_response,
            cancel,
            current: 0,
        }
    }

    /// Cancel the active task (if any) and start fresh work with the
    /// given settings. Returns immediately; the worker picks the request
    /// up asynchronously.
    pub fn submit(&mut self, grid: PreviewGrid, settings: PreviewSettings) -> TaskHandle {
        self.cancel.cancel();
        self.current += 1;
        let handle = TaskHandle(self.current);
        debug!(
            id = self.current,
            layer = %settings.layer,
            zoom = settings.zoom,
            "Submitting preview task"
        );
        let _ = self.tx_request.send(TaskRequest {
            handle,
            grid,
            settings,
        });
        handle
    }

    /// The handle whose outcome `poll` will surface.
    pub fn current_handle(&self) -> TaskHandle {
        TaskHandle(self.current)
    }

    /// Cancel the active task without replacing it. The current handle
    /// becomes stale, so a late outcome from the cancelled task is
    /// dropped even if the worker finishes it.
    pub fn cancel_current(&mut self) {
        self.cancel.cancel();
        self.current += 1;
    }

    /// Non-blocking check for the current task's terminal outcome.
    ///
    /// Outcomes of superseded handles are silently dropped here, so the
    /// control loop only ever observes the newest request's result, and
    /// only once.
    pub fn poll(&mut self) -> Option<(TaskHandle, TaskOutcome)> {
        while let Ok(resp) = self.rx_response.try_recv() {
            if resp.handle == TaskHandle(self.current) {
                return Some((resp.handle, resp.outcome));
            }
            debug!(
                stale = resp.handle.0,
                current = self.current,
                "Dropping stale task outcome"
            );
        }
        None
    }

    /// Row progress of the scan currently running, for host display.
    pub fn progress(&self) -> (usize, usize) {
        self.cancel.progress()
    }
}

/// Collapse a burst of queued requests to the newest one, so rapidly
/// superseded tasks never even start.
fn drain_latest(initial: TaskRequest, rx: &mpsc::Receiver<TaskRequest>) -> TaskRequest {
    let mut req = initial;
    while let Ok(newer) = rx.try_recv() {
        req = newer;
    }
    req
}

fn task_worker<S: LayerSampler + Sync>(
    sampler: Arc<S>,
    rx: mpsc::Receiver<TaskRequest>,
    tx: mpsc::Sender<TaskResponse>,
    cancel: Arc<TaskCancel>,
) {
    debug!("Preview worker thread started");
    while let Ok(initial) = rx.recv() {
        let req = drain_latest(initial, &rx);

        // Seed side channel: applied before any sampling for this task.
        sampler.set_seed(&req.settings.seed);

        let outcome = match generate(
            &req.grid,
            req.settings.zoom,
            &req.settings.layer,
            sampler.as_ref(),
            cancel.as_ref(),
        ) {
            Ok(Generated::Buffer(buffer)) => TaskOutcome::Success(buffer),
            Ok(Generated::Cancelled) => TaskOutcome::Cancelled,
            Err(e) => {
                error!(error = %e, id = req.handle.0, "Preview task failed");
                TaskOutcome::Failure(e)
            }
        };

        if tx
            .send(TaskResponse {
                handle: req.handle,
                outcome,
            })
            .is_err()
        {
            return; // coordinator dropped
        }
    }
    debug!("Preview worker thread exiting");
}
