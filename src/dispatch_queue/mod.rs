//! Serialized job dispatch with a cool-down between jobs
//!
//! A single worker task owns the receiving end of an unbounded channel and
//! runs jobs strictly one at a time in arrival order. After a job completes
//! the worker idles for the cool-down, but only if another job is already
//! waiting. Each caller awaits its own oneshot completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::extraction::{ErrorKind, ExtractionRequest, ExtractionResult};

/// Executes one dequeued job
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, request: ExtractionRequest) -> ExtractionResult;
}

struct QueueJob {
    id: u64,
    request: ExtractionRequest,
    completion: oneshot::Sender<ExtractionResult>,
}

/// FIFO queue feeding a single worker
pub struct DispatchQueue {
    tx: mpsc::UnboundedSender<QueueJob>,
    next_id: AtomicU64,
    /// Jobs submitted and not yet completed, including the running one
    pending: Arc<AtomicUsize>,
    draining: Arc<AtomicBool>,
    worker_handle: JoinHandle<()>,
}

impl DispatchQueue {
    /// Spawn the worker. Must be called from within a Tokio runtime.
    pub fn new(runner: Arc<dyn JobRunner>, cooldown: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let draining = Arc::new(AtomicBool::new(false));

        let worker_handle = tokio::spawn(Self::worker_loop(
            runner,
            cooldown,
            rx,
            Arc::clone(&pending),
            Arc::clone(&draining),
        ));

        Self {
            tx,
            next_id: AtomicU64::new(1),
            pending,
            draining,
            worker_handle,
        }
    }

    /// Enqueue a request and wait for its terminal result.
    pub async fn submit(&self, request: ExtractionRequest) -> ExtractionResult {
        let (completion, response_rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.pending.fetch_add(1, Ordering::SeqCst);
        let job = QueueJob {
            id,
            request,
            completion,
        };
        if self.tx.send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return ExtractionResult::failure(ErrorKind::ProcessingError(
                "Dispatch worker is not running".to_string(),
            ));
        }
        log::debug!(target: "bannerscrape::queue", "Job {id} queued");

        response_rx.await.unwrap_or_else(|_| {
            ExtractionResult::failure(ErrorKind::ProcessingError(
                "Dispatch worker dropped the job".to_string(),
            ))
        })
    }

    /// Jobs waiting or running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Whether the worker is between the first job of a burst and the
    /// moment the queue runs empty
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    async fn worker_loop(
        runner: Arc<dyn JobRunner>,
        cooldown: Duration,
        mut rx: mpsc::UnboundedReceiver<QueueJob>,
        pending: Arc<AtomicUsize>,
        draining: Arc<AtomicBool>,
    ) {
        log::debug!(target: "bannerscrape::queue", "Dispatch worker started");

        while let Some(job) = rx.recv().await {
            draining.store(true, Ordering::SeqCst);
            let QueueJob {
                id,
                request,
                completion,
            } = job;

            log::info!(
                target: "bannerscrape::queue",
                "Job {id} running: {} ({})",
                request.raw_artist_url,
                request.device_profile
            );
            let result = Self::run_isolated(&runner, request).await;
            match result.error() {
                None => log::info!(target: "bannerscrape::queue", "Job {id} completed"),
                Some(reason) => {
                    log::warn!(target: "bannerscrape::queue", "Job {id} failed: {reason}");
                }
            }

            let remaining = pending.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            if completion.send(result).is_err() {
                log::debug!(target: "bannerscrape::queue", "Job {id} caller went away");
            }

            if remaining > 0 {
                log::info!(
                    target: "bannerscrape::queue",
                    "Cooling down for {cooldown:?} before next job ({remaining} waiting)"
                );
                tokio::time::sleep(cooldown).await;
            } else {
                draining.store(false, Ordering::SeqCst);
                log::debug!(target: "bannerscrape::queue", "Queue drained");
            }
        }

        log::debug!(target: "bannerscrape::queue", "Dispatch worker stopped");
    }

    /// Run a job on its own task so a panic becomes a failed result instead
    /// of killing the worker.
    async fn run_isolated(runner: &Arc<dyn JobRunner>, request: ExtractionRequest) -> ExtractionResult {
        let runner = Arc::clone(runner);
        match tokio::spawn(async move { runner.run(request).await }).await {
            Ok(result) => result,
            Err(join_error) => {
                let message = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    "job was cancelled".to_string()
                };
                ExtractionResult::failure(ErrorKind::ProcessingError(message))
            }
        }
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        self.worker_handle.abort();
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "job panicked".to_string()
    }
}
