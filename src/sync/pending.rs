//! Tabs that arrived before their window had an active workspace

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::data::{TabId, WindowId};

/// Per-window queue of tab ids waiting for an active workspace.
///
/// `take` drains a window's queue under the lock, so however many flushes
/// race, each queued tab is handed out once.
#[derive(Debug, Default)]
pub struct PendingTabs {
    queues: Mutex<HashMap<WindowId, Vec<TabId>>>,
}

impl PendingTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tab; returns `false` when it was already queued
    pub fn push(&self, window_id: WindowId, tab_id: TabId) -> bool {
        let mut queues = self.queues.lock();
        let queue = queues.entry(window_id).or_default();
        if queue.contains(&tab_id) {
            return false;
        }
        queue.push(tab_id);
        true
    }

    /// Drain a window's queue
    pub fn take(&self, window_id: WindowId) -> Vec<TabId> {
        self.queues.lock().remove(&window_id).unwrap_or_default()
    }

    /// Put tabs back at the head of a window's queue after a failed flush
    pub fn requeue(&self, window_id: WindowId, tab_ids: Vec<TabId>) {
        let mut queues = self.queues.lock();
        let queue = queues.entry(window_id).or_default();
        let mut merged = tab_ids;
        merged.retain(|tab| !queue.contains(tab));
        merged.append(queue);
        *queue = merged;
    }

    /// Forget a queued tab that was closed; returns whether it was queued
    pub fn discard_tab(&self, window_id: WindowId, tab_id: TabId) -> bool {
        let mut queues = self.queues.lock();
        let Some(queue) = queues.get_mut(&window_id) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|tab| *tab != tab_id);
        let removed = queue.len() != before;
        if queue.is_empty() {
            queues.remove(&window_id);
        }
        removed
    }

    /// Drop a window's queue entirely, returning what was queued
    pub fn discard_window(&self, window_id: WindowId) -> Vec<TabId> {
        self.take(window_id)
    }

    /// Snapshot of a window's queue
    pub fn queued(&self, window_id: WindowId) -> Vec<TabId> {
        self.queues
            .lock()
            .get(&window_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self, window_id: WindowId) -> bool {
        self.queues
            .lock()
            .get(&window_id)
            .map_or(true, |queue| queue.is_empty())
    }
}
