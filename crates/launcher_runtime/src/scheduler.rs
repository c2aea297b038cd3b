//! UI-thread task scheduling and the bounded background worker pool.
//!
//! Binding effects run on the single-threaded [`UiScheduler`]; only I/O-bound work such as icon
//! reloads is handed to the [`WorkerPool`].

use std::{cell::RefCell, future::Future, rc::Rc};

use futures::{
    executor::{LocalPool, LocalSpawner, ThreadPool},
    task::LocalSpawnExt,
};
use tracing::warn;

use crate::error::{RuntimeError, RuntimeResult};

type FailureSlot = Rc<RefCell<Option<RuntimeError>>>;

/// Cooperative scheduler owned by the UI thread.
pub struct UiScheduler {
    pool: LocalPool,
    handle: UiHandle,
}

impl Default for UiScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl UiScheduler {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let handle = UiHandle {
            spawner: pool.spawner(),
            failure: Rc::new(RefCell::new(None)),
        };
        Self { pool, handle }
    }

    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Runs every task until none can make progress.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a fallible task since the previous call.
    pub fn run_until_stalled(&mut self) -> RuntimeResult<()> {
        self.pool.run_until_stalled();
        match self.handle.failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Clonable spawner for the UI scheduler.
#[derive(Clone)]
pub struct UiHandle {
    spawner: LocalSpawner,
    failure: FailureSlot,
}

impl UiHandle {
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) -> RuntimeResult<()> {
        self.spawner.spawn_local(task)?;
        Ok(())
    }

    /// Spawns a task whose error is reported by [`UiScheduler::run_until_stalled`].
    pub fn spawn_fallible(
        &self,
        task: impl Future<Output = RuntimeResult<()>> + 'static,
    ) -> RuntimeResult<()> {
        let failure = Rc::clone(&self.failure);
        self.spawn(async move {
            if let Err(err) = task.await {
                warn!(error = %err, "UI task failed");
                let mut slot = failure.borrow_mut();
                if slot.is_none() {
                    *slot = Some(err);
                }
            }
        })
    }
}

/// Bounded pool for I/O-bound side effects.
#[derive(Clone)]
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> RuntimeResult<Self> {
        if size == 0 {
            return Err(RuntimeError::WorkerPool(
                "worker pool needs at least one thread".to_string(),
            ));
        }
        let pool = ThreadPool::builder()
            .pool_size(size)
            .name_prefix("launcher-worker-")
            .create()
            .map_err(|err| RuntimeError::WorkerPool(err.to_string()))?;
        Ok(Self { pool, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `job` on a worker thread. Fire-and-forget.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        self.pool.spawn_ok(async move { job() });
    }
}
