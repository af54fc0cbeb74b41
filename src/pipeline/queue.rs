//! Unbounded FIFO handoff between two stations, with a drain barrier.
//!
//! Every `push` must eventually be matched by one `mark_done` from whoever
//! popped the item. `wait_until_drained` resolves once the two counts meet.
//! Draining is only a meaningful signal after the upstream queue has drained
//! too, since until then new pushes may still arrive.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{Notify, watch};

/// Push/done counters of one queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: u64,
    pub done: u64,
}

pub struct StageQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Notify,
    /// Items pushed but not yet marked done.
    unfinished: watch::Sender<usize>,
    pushed: AtomicU64,
    done: AtomicU64,
}

impl<T> StageQueue<T> {
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            unfinished,
            pushed: AtomicU64::new(0),
            done: AtomicU64::new(0),
        }
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<T>> {
        // The deque holds plain values, a panic elsewhere cannot leave it torn.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends an item and wakes one idle consumer. Never blocks.
    pub fn push(&self, item: T) {
        // Count first so a concurrent drain check never sees zero while the
        // item is already visible to consumers.
        self.unfinished.send_modify(|n| *n += 1);
        self.pushed.fetch_add(1, Ordering::Relaxed);
        self.items().push_back(item);
        self.available.notify_one();
    }

    /// Removes the oldest item, waiting until one is available.
    ///
    /// Cancel-safe: dropping the future before it resolves never loses an item.
    pub async fn pop(&self) -> T {
        loop {
            {
                let mut items = self.items();
                if let Some(item) = items.pop_front() {
                    // Pass the wakeup on; a single stored permit may have
                    // stood for several pushes.
                    if !items.is_empty() {
                        self.available.notify_one();
                    }
                    return item;
                }
            }
            self.available.notified().await;
        }
    }

    /// Records that one popped item has been fully processed.
    pub fn mark_done(&self) {
        let matched = self.unfinished.send_if_modified(|n| {
            if *n == 0 {
                false
            } else {
                *n -= 1;
                true
            }
        });

        if matched {
            self.done.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::warn!("mark_done called more times than items were pushed");
        }
    }

    /// Resolves once every pushed item has been marked done.
    pub async fn wait_until_drained(&self) {
        let mut rx = self.unfinished.subscribe();
        if rx.wait_for(|n| *n == 0).await.is_err() {
            // Unreachable while `self` is borrowed: the sender lives in the queue.
            tracing::warn!("Queue closed while waiting for drain");
        }
    }

    /// Items waiting to be popped.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items pushed but not yet marked done (queued or in flight).
    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            done: self.done.load(Ordering::Relaxed),
        }
    }
}

impl<T> Default for StageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
