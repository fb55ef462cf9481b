//! Background database worker.
//!
//! Interactive code must not stall on the store, so database work is handed
//! to a single tokio task that owns a [`Db`] handle and drains a command
//! queue. Jobs run one at a time, strictly in submission order.
//!
//! Every submission returns a [`Pending`] handle. The caller can await it,
//! await it with a deadline, or poll it. An expired deadline is not an error:
//! the job keeps running and its result can still be collected later.
//!
//! ```rust
//! use curtain::db::db::Db;
//! use curtain::libs::worker::DbWorker;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let worker = DbWorker::spawn(Db::open_in_memory()?);
//! let version = worker
//!     .submit(|db| async move { db.scalar("SELECT sqlite_version() IS NOT NULL", &[]).await })
//!     .wait()
//!     .await??;
//! assert_eq!(version, 1);
//! worker.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::db::Db;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

type Job = Box<dyn FnOnce(Db) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("database worker is not running")]
    Closed,
    #[error("database worker stopped abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct DbWorker {
    jobs: mpsc::UnboundedSender<Job>,
    handle: JoinHandle<()>,
}

impl DbWorker {
    /// Starts the worker task. Must be called inside a tokio runtime.
    pub fn spawn(db: Db) -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        let handle = tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                job(db.clone()).await;
            }
            tracing::debug!("database worker queue closed");
        });
        Self { jobs, handle }
    }

    /// Queues `task` and returns a handle to its result.
    ///
    /// If the worker has already stopped, the handle reports
    /// [`WorkerError::Closed`] when waited on.
    pub fn submit<T, F, Fut>(&self, task: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce(Db) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        let job: Job = Box::new(move |db| {
            Box::pin(async move {
                // The caller may have dropped its handle; the result is discarded then.
                let _ = reply.send(task(db).await);
            })
        });
        if self.jobs.send(job).is_err() {
            tracing::warn!("job submitted to a stopped database worker");
        }
        Pending { rx }
    }

    pub fn is_running(&self) -> bool {
        !self.jobs.is_closed() && !self.handle.is_finished()
    }

    /// Closes the queue and waits for the jobs already queued to finish.
    pub async fn shutdown(self) -> Result<(), WorkerError> {
        drop(self.jobs);
        self.handle.await?;
        Ok(())
    }
}

/// The result of a submitted job, delivered once.
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Pending<T> {
    /// Waits for the job to finish.
    ///
    /// # Returns
    ///
    /// The job's output, or [`WorkerError::Closed`] when the worker stopped
    /// before running it.
    pub async fn wait(self) -> Result<T, WorkerError> {
        self.rx.await.map_err(|_| WorkerError::Closed)
    }

    /// Waits at most `timeout`. `Ok(None)` means the job is still running.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Result<Option<T>, WorkerError> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(value)) => Ok(Some(value)),
            Ok(Err(_)) => Err(WorkerError::Closed),
            Err(_) => Ok(None),
        }
    }

    /// Non-blocking poll. `Ok(None)` means the job is still running.
    pub fn try_take(&mut self) -> Result<Option<T>, WorkerError> {
        match self.rx.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(WorkerError::Closed),
        }
    }
}
