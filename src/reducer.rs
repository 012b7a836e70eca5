//! Breadth-first fold over a self-extending worklist.
//!
//! `TreeReducer` knows nothing about what its items are. The processing
//! function receives the reducer itself and may queue follow-up work, which
//! is how a tree whose shape is only discovered while visiting it gets
//! walked level by level.

use std::collections::VecDeque;

/// FIFO worklist driving a fold
#[derive(Debug, Clone)]
pub struct TreeReducer<T> {
    /// Pending items, front is processed next
    queue: VecDeque<T>,
}

impl<T> TreeReducer<T> {
    /// Create a reducer whose queue holds a single item
    #[must_use]
    pub fn new(item: T) -> Self {
        let mut queue = VecDeque::with_capacity(16);
        queue.push_back(item);
        Self { queue }
    }

    /// Create a reducer seeded with an ordered collection of items
    #[must_use]
    pub fn from_items<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self {
            queue: items.into_iter().collect(),
        }
    }

    /// Append one item to the back of the queue
    pub fn push(&mut self, item: T) {
        self.queue.push_back(item);
    }

    /// Number of items still waiting
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True once every queued item has been processed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain the queue front to back, threading `memo` through `f`
    ///
    /// `f` gets this reducer back so it can enqueue more work while the loop
    /// is running; anything it adds is processed after the items already
    /// waiting. Every item is handed to `f` exactly once.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by `f` and returns it. Items not yet
    /// processed stay in the queue.
    pub fn reduce<M, E, F>(&mut self, mut memo: M, mut f: F) -> Result<M, E>
    where
        F: FnMut(&mut Self, M, T) -> Result<M, E>,
    {
        while let Some(item) = self.queue.pop_front() {
            memo = f(self, memo, item)?;
        }

        Ok(memo)
    }
}

/// Batch enqueue. Relative order of the batch is kept, and an empty batch
/// (including `None`) is a no-op.
impl<T> Extend<T> for TreeReducer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}
