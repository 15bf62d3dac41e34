//! Capped ordered collection backing the append-only reducers.

use std::collections::VecDeque;

/// An ordered sequence that never holds more than `cap` items.
///
/// Two insertion disciplines are offered and a reducer picks one:
/// - [`push_front`](Self::push_front): most-recent-first, overflow drops the tail.
/// - [`push_back`](Self::push_back): chronological, overflow drops the head.
#[derive(Debug, Clone)]
pub struct BoundedSeries<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T> BoundedSeries<T> {
    /// A cap of `0` is raised to `1`.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            items: VecDeque::with_capacity(cap.min(4096)),
            cap,
        }
    }

    /// Insert at the front; returns the evicted tail item, if any.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        self.items.push_front(item);
        if self.items.len() > self.cap {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// Append at the back; returns the evicted head item, if any.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > self.cap {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Replace everything, keeping at most `cap` items from the start of `items`.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.items.extend(items.into_iter().take(self.cap));
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
