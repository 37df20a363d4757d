//! Cancellable delayed tasks
//!
//! Each [`Task`] key has at most one pending timer. Scheduling a key again
//! replaces the earlier timer (last write wins). Fired tasks are delivered
//! over a channel and drained by the UI loop, so all state changes still
//! happen on the UI thread.

use crate::state::Field;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Work the UI loop runs once its timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Validate and persist a field after typing pauses
    Commit(Field),
    /// Recompute the provider list after typing pauses
    ProviderFilter,
    /// Finish the simulated submission
    Submission,
}

#[derive(Debug)]
struct PendingTask {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<(Task, u64)>,
    rx: mpsc::UnboundedReceiver<(Task, u64)>,
    pending: HashMap<Task, PendingTask>,
    next_generation: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Run `task` after `delay`, replacing any pending timer for the same key.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, task: Task, delay: Duration) {
        self.cancel(task);
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A closed channel means the scheduler is gone
            let _ = tx.send((task, generation));
        });
        self.pending.insert(task, PendingTask { generation, handle });
    }

    /// Cancel a pending task. Returns whether one was pending.
    pub fn cancel(&mut self, task: Task) -> bool {
        match self.pending.remove(&task) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel everything; used on teardown and after submission
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
        count
    }

    /// Cancel pending field commits, returning the affected fields
    pub fn cancel_commits(&mut self) -> Vec<Field> {
        let fields: Vec<Field> = self
            .pending
            .keys()
            .filter_map(|task| match task {
                Task::Commit(field) => Some(*field),
                _ => None,
            })
            .collect();
        for field in &fields {
            self.cancel(Task::Commit(*field));
        }
        fields
    }

    #[cfg(test)]
    pub fn is_pending(&self, task: Task) -> bool {
        self.pending.contains_key(&task)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Next fired task without waiting
    pub fn try_next(&mut self) -> Option<Task> {
        while let Ok((task, generation)) = self.rx.try_recv() {
            if self.accept(task, generation) {
                return Some(task);
            }
        }
        None
    }

    /// Wait for the next fired task
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<Task> {
        loop {
            let (task, generation) = self.rx.recv().await?;
            if self.accept(task, generation) {
                return Some(task);
            }
        }
    }

    /// A fired timer counts only if it is still the current one for its key
    fn accept(&mut self, task: Task, generation: u64) -> bool {
        match self.pending.get(&task) {
            Some(pending) if pending.generation == generation => {
                self.pending.remove(&task);
                true
            }
            _ => false,
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
