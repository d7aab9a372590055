//! Strata Task Worker
//!
//! Single-threaded background worker backing the async facade operations.
//! One explicit task queue, one worker thread: tasks submitted to the same
//! worker run in FIFO order, and completion callbacks run on the worker
//! thread rather than the caller's. There is no cancellation or timeout for
//! queued work; once submitted, a task runs to completion.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::error::{Result, StrataError};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send + 'static>;

// =============================================================================
// Task Worker
// =============================================================================

/// A FIFO task queue with exactly one worker thread.
pub struct TaskWorker {
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskWorker {
    /// Spawn a new worker thread with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<Task>();

        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Ok(task) = rx.recv() {
                    if catch_unwind(AssertUnwindSafe(task)).is_err() {
                        tracing::warn!(worker = %name, "background task panicked");
                    }
                }
            })
            .expect("failed to spawn worker thread");

        Self {
            sender: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue a task for execution on the worker thread.
    ///
    /// Fails with `QueueClosed` once the worker has been shut down.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(tx) => tx
                .send(Box::new(task))
                .map_err(|_| StrataError::QueueClosed),
            None => Err(StrataError::QueueClosed),
        }
    }

    /// Stop accepting tasks, drain the queue, and join the worker thread.
    ///
    /// Tasks already queued still run before the thread exits.
    pub fn shutdown(&self) {
        let tx = self.sender.lock().take();
        drop(tx);

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    /// Check whether the worker still accepts tasks.
    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }
}

impl Drop for TaskWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Tests
// =============================================================================
