use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::cache::types::IoPoolSize;

/// JobProgress is returned after each step of an [`IoJob`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum JobProgress {
    Pending,
    Finished,
}

/// IoJob is a physical operation that is executed one step (typically one chunk) at a time.
///
/// A job that returns [`JobProgress::Pending`] is put back at the end of the queue, so a large payload
/// does not occupy a worker for the full transfer while other keys are waiting.
/// A job that is dropped before it finishes must complete its waiters on drop.
pub(crate) trait IoJob: Send {
    fn step(&mut self) -> JobProgress;
}

enum ExecutorMessage {
    Run(Box<dyn IoJob>),
    Shutdown,
}

/// IoExecutor runs [`IoJob`]s on a fixed pool of worker threads fed by a crossbeam channel.
pub(crate) struct IoExecutor {
    sender: Sender<ExecutorMessage>,
    pool_size: IoPoolSize,
    keep_running: Arc<AtomicBool>,
}

impl IoExecutor {
    pub(crate) fn new(pool_size: IoPoolSize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let executor = IoExecutor { sender, pool_size, keep_running: Arc::new(AtomicBool::new(true)) };

        (0..pool_size).for_each(|worker_id| executor.spin(worker_id, receiver.clone()));
        info!("Initialized IoExecutor with {} workers", pool_size);
        executor
    }

    fn spin(&self, worker_id: usize, receiver: Receiver<ExecutorMessage>) {
        let keep_running = self.keep_running.clone();
        let sender = self.sender.clone();

        thread::spawn(move || {
            while let Ok(message) = receiver.recv() {
                let mut job = match message {
                    ExecutorMessage::Run(job) => job,
                    ExecutorMessage::Shutdown => break,
                };
                if let JobProgress::Pending = job.step() {
                    if !keep_running.load(Ordering::Acquire) {
                        break;
                    }
                    if sender.send(ExecutorMessage::Run(job)).is_err() {
                        break;
                    }
                }
            }
            debug!("shutting down IoExecutor worker {}", worker_id);
        });
    }

    /// Queues the job. If the executor has been shutdown, the job is dropped right away.
    pub(crate) fn execute(&self, job: Box<dyn IoJob>) {
        if !self.keep_running.load(Ordering::Acquire) {
            return;
        }
        let _ = self.sender.send(ExecutorMessage::Run(job));
    }

    pub(crate) fn shutdown(&self) {
        if self.keep_running.swap(false, Ordering::AcqRel) {
            (0..self.pool_size).for_each(|_| {
                let _ = self.sender.send(ExecutorMessage::Shutdown);
            });
        }
    }
}

impl Drop for IoExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
