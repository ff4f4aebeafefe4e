//! Worker pool for asynchronous execution.
//!
//! A FIFO job queue served by worker threads that are spawned on demand,
//! up to a configured maximum, and live until [`WorkerPool::shutdown`].
//! The pool is an explicit resource: a dispatcher owns one, or several
//! dispatchers share one through an `Arc`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info};

use crate::config::DispatcherConfig;
use crate::error::ExecutionError;

type Job = Box<dyn FnOnce() + Send>;

/// Pool metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of jobs waiting in the queue.
    pub queue_depth: usize,
    /// Number of jobs currently being executed by workers.
    pub active_tasks: usize,
    /// Total number of jobs completed since pool creation.
    pub tasks_completed: u64,
    /// Number of worker threads spawned so far.
    pub worker_count: usize,
}

struct PoolInner {
    queue: Mutex<VecDeque<Job>>,
    work_ready: Condvar,
    drain_cond: Condvar,
    shutdown: AtomicBool,
    queue_depth: AtomicUsize,
    active_tasks: AtomicUsize,
    idle_workers: AtomicUsize,
    tasks_completed: AtomicU64,
    max_queue_depth: usize,
}

/// Lazily sized pool of worker threads.
pub struct WorkerPool {
    inner: Arc<PoolInner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    max_workers: usize,
    thread_name_prefix: String,
}

impl WorkerPool {
    /// Create a pool. No threads are started until work is submitted.
    pub fn new(max_workers: usize, max_queue_depth: usize, thread_name_prefix: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                queue: Mutex::new(VecDeque::new()),
                work_ready: Condvar::new(),
                drain_cond: Condvar::new(),
                shutdown: AtomicBool::new(false),
                queue_depth: AtomicUsize::new(0),
                active_tasks: AtomicUsize::new(0),
                idle_workers: AtomicUsize::new(0),
                tasks_completed: AtomicU64::new(0),
                max_queue_depth: max_queue_depth.max(1),
            }),
            workers: Mutex::new(Vec::new()),
            max_workers: max_workers.max(1),
            thread_name_prefix: thread_name_prefix.into(),
        }
    }

    /// Create a pool sized by a dispatcher configuration.
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self::new(
            config.max_workers,
            config.max_queue_depth,
            config.thread_name_prefix.clone(),
        )
    }

    /// Queue a job.
    ///
    /// Returns `Err(ExecutionError::Rejected)` if the queue is at capacity,
    /// the pool has been shut down, or no worker could be started.
    pub fn submit(&self, work: impl FnOnce() + Send + 'static) -> Result<(), ExecutionError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            return Err(ExecutionError::Rejected {
                reason: "worker pool is shut down".to_string(),
            });
        }
        if self.inner.queue_depth.load(Ordering::Acquire) >= self.inner.max_queue_depth {
            return Err(ExecutionError::Rejected {
                reason: "worker pool queue is full".to_string(),
            });
        }

        let needs_worker = {
            let mut queue = self.inner.queue.lock();
            queue.push_back(Box::new(work));
            self.inner.queue_depth.fetch_add(1, Ordering::Release);
            queue.len() > self.inner.idle_workers.load(Ordering::Acquire)
        };

        if needs_worker {
            self.spawn_worker()?;
        }
        self.inner.work_ready.notify_one();
        Ok(())
    }

    fn spawn_worker(&self) -> Result<(), ExecutionError> {
        let mut workers = self.workers.lock();
        if workers.len() >= self.max_workers || self.inner.shutdown.load(Ordering::Acquire) {
            return Ok(());
        }

        let inner = Arc::clone(&self.inner);
        let name = format!("{}-{}", self.thread_name_prefix, workers.len());
        match std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(&inner))
        {
            Ok(handle) => {
                debug!(target: "verba::pool", worker = %name, "Worker started");
                workers.push(handle);
                Ok(())
            }
            Err(e) if workers.is_empty() => {
                error!(target: "verba::pool", error = %e, "Failed to start worker");
                // Nothing will ever run the queued job; take it back out.
                let mut queue = self.inner.queue.lock();
                if queue.pop_back().is_some() {
                    self.inner.queue_depth.fetch_sub(1, Ordering::Release);
                }
                Err(ExecutionError::Rejected {
                    reason: format!("failed to start worker: {}", e),
                })
            }
            Err(e) => {
                // Existing workers will pick the job up.
                error!(target: "verba::pool", error = %e, "Failed to start additional worker");
                Ok(())
            }
        }
    }

    /// Block until all queued and in-flight jobs have completed.
    ///
    /// Workers remain running after drain completes.
    pub fn drain(&self) {
        let mut queue = self.inner.queue.lock();
        while self.inner.queue_depth.load(Ordering::Acquire) > 0
            || self.inner.active_tasks.load(Ordering::Acquire) > 0
        {
            self.inner.drain_cond.wait(&mut queue);
        }
    }

    /// Stop accepting work, let workers finish the queue, and join them.
    pub fn shutdown(&self) {
        let was_running = !self.inner.shutdown.swap(true, Ordering::AcqRel);

        // Notify under the queue lock so a worker between its shutdown check
        // and its wait cannot miss the wakeup.
        {
            let _queue = self.inner.queue.lock();
            self.inner.work_ready.notify_all();
        }

        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
        if was_running {
            info!(target: "verba::pool", "Worker pool shut down");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }

    /// Return a snapshot of pool metrics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            queue_depth: self.inner.queue_depth.load(Ordering::Relaxed),
            active_tasks: self.inner.active_tasks.load(Ordering::Relaxed),
            tasks_completed: self.inner.tasks_completed.load(Ordering::Relaxed),
            worker_count: self.workers.lock().len(),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::from_config(&DispatcherConfig::default())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Signal only; the last reference may be dropped on a worker thread,
        // which cannot join itself.
        self.inner.shutdown.store(true, Ordering::Release);
        let _queue = self.inner.queue.lock();
        self.inner.work_ready.notify_all();
    }
}

/// Decrements `active_tasks` and wakes drain waiters on drop, including
/// when the job panics.
struct ActiveTaskGuard<'a> {
    inner: &'a PoolInner,
}

impl<'a> Drop for ActiveTaskGuard<'a> {
    fn drop(&mut self) {
        let prev_active = self.inner.active_tasks.fetch_sub(1, Ordering::Release);
        self.inner.tasks_completed.fetch_add(1, Ordering::Relaxed);

        if prev_active == 1 && self.inner.queue_depth.load(Ordering::Acquire) == 0 {
            let _queue = self.inner.queue.lock();
            self.inner.drain_cond.notify_all();
        }
    }
}

fn worker_loop(inner: &PoolInner) {
    loop {
        let job = {
            let mut queue = inner.queue.lock();
            loop {
                if let Some(job) = queue.pop_front() {
                    inner.queue_depth.fetch_sub(1, Ordering::Release);
                    inner.active_tasks.fetch_add(1, Ordering::Release);
                    break job;
                }
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                inner.idle_workers.fetch_add(1, Ordering::Release);
                inner.work_ready.wait(&mut queue);
                inner.idle_workers.fetch_sub(1, Ordering::Release);
            }
        };

        let _guard = ActiveTaskGuard { inner };

        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
            error!(
                target: "verba::pool",
                "job panicked: {}",
                e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
            );
        }
    }
}
