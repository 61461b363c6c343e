use crate::mirror::FeedMirror;
use fleetwatch_common::types::Notification;

/// Number of notifications kept when no other retention is configured.
pub const DEFAULT_RETENTION: usize = 30;

/// Newest-first notification feed with read state.
///
/// The unread count is always derived by scanning the feed. When a mirror is
/// attached, the whole feed is written to it after every mutation that
/// changed something; mirror failures are logged and do not undo the
/// in-memory change.
pub struct NotificationStore {
    items: Vec<Notification>,
    retention: usize,
    mirror: Option<Box<dyn FeedMirror>>,
}

impl NotificationStore {
    pub fn new(retention: usize) -> Self {
        Self {
            items: Vec::new(),
            retention,
            mirror: None,
        }
    }

    /// Opens a store seeded from `mirror`. Data the mirror cannot read is
    /// treated as an empty history.
    pub fn with_mirror(retention: usize, mirror: Box<dyn FeedMirror>) -> Self {
        let mut items = match mirror.load() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable notification history");
                Vec::new()
            }
        };
        items.truncate(retention);
        tracing::debug!(count = items.len(), "Notification store opened");

        Self {
            items,
            retention,
            mirror: Some(mirror),
        }
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Prepends `batch` (its first element ends up newest) and drops the
    /// oldest entries beyond the retention cap.
    pub fn append(&mut self, batch: Vec<Notification>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len();
        let mut items = batch;
        items.append(&mut self.items);
        items.truncate(self.retention);
        self.items = items;

        tracing::debug!(count, unread = self.unread_count(), "Notifications appended");
        self.sync();
    }

    /// Returns false when no notification has this id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if !item.read {
            item.read = true;
            self.sync();
        }
        true
    }

    pub fn mark_all_read(&mut self) {
        let mut changed = false;
        for item in self.items.iter_mut().filter(|n| !n.read) {
            item.read = true;
            changed = true;
        }
        if changed {
            self.sync();
        }
    }

    /// Returns false when no notification has this id.
    pub fn remove(&mut self, id: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|n| n.id != id);
        let removed = self.items.len() < len_before;
        if removed {
            self.sync();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.sync();
    }

    fn sync(&mut self) {
        let Some(mirror) = self.mirror.as_mut() else {
            return;
        };
        if let Err(e) = mirror.save(&self.items) {
            tracing::warn!(error = %e, "Failed to mirror notification feed");
        }
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}
