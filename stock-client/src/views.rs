//! Stale-view registry
//!
//! Views that read remote state (catalog, picker list, report history) are
//! refetched by their owners. This registry only records that they have gone
//! stale: each key carries a generation counter, and every invalidation is
//! broadcast to subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Remote-backed views that can go stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Full item catalog
    Items,
    /// `{id, name}` list used by the item picker
    ItemRefs,
    /// Committed report history
    ReportHistory,
}

impl ViewKey {
    /// Views affected by committing, editing or deleting a report
    pub const AFTER_REPORT_CHANGE: [ViewKey; 3] =
        [ViewKey::ReportHistory, ViewKey::Items, ViewKey::ItemRefs];

    /// Views affected by creating an item
    pub const AFTER_ITEM_CHANGE: [ViewKey; 2] = [ViewKey::Items, ViewKey::ItemRefs];
}

/// Shared registry of view generations
#[derive(Debug, Clone)]
pub struct StaleViews {
    generations: Arc<RwLock<HashMap<ViewKey, u64>>>,
    tx: broadcast::Sender<ViewKey>,
}

impl Default for StaleViews {
    fn default() -> Self {
        Self::new()
    }
}

impl StaleViews {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            generations: Arc::new(RwLock::new(HashMap::new())),
            tx,
        }
    }

    /// Mark views stale and notify subscribers
    pub fn invalidate(&self, keys: &[ViewKey]) {
        {
            let mut generations = self.generations.write();
            for key in keys {
                *generations.entry(*key).or_insert(0) += 1;
            }
        }
        for key in keys {
            tracing::debug!(view = ?key, "View marked stale");
            // No receivers is fine: nobody is watching right now.
            let _ = self.tx.send(*key);
        }
    }

    /// Number of times `key` has been invalidated.
    ///
    /// A view remembers the generation it last loaded at and refetches when
    /// this value moves past it.
    pub fn generation(&self, key: ViewKey) -> u64 {
        self.generations.read().get(&key).copied().unwrap_or(0)
    }

    /// Whether `key` was invalidated after the view loaded at `seen`
    pub fn is_stale(&self, key: ViewKey, seen: u64) -> bool {
        self.generation(key) > seen
    }

    /// Receive every future invalidation
    pub fn subscribe(&self) -> broadcast::Receiver<ViewKey> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_advance() {
        let views = StaleViews::new();
        assert_eq!(views.generation(ViewKey::Items), 0);

        views.invalidate(&[ViewKey::Items]);
        views.invalidate(&ViewKey::AFTER_REPORT_CHANGE);

        assert_eq!(views.generation(ViewKey::Items), 2);
        assert_eq!(views.generation(ViewKey::ItemRefs), 1);
        assert_eq!(views.generation(ViewKey::ReportHistory), 1);
        assert!(views.is_stale(ViewKey::Items, 1));
        assert!(!views.is_stale(ViewKey::Items, 2));
    }

    #[test]
    fn test_clones_share_state() {
        let views = StaleViews::new();
        let other = views.clone();
        other.invalidate(&[ViewKey::ReportHistory]);
        assert_eq!(views.generation(ViewKey::ReportHistory), 1);
    }

    #[tokio::test]
    async fn test_subscribers_receive_keys() {
        let views = StaleViews::new();
        let mut rx = views.subscribe();
        views.invalidate(&ViewKey::AFTER_ITEM_CHANGE);
        assert_eq!(rx.recv().await.unwrap(), ViewKey::Items);
        assert_eq!(rx.recv().await.unwrap(), ViewKey::ItemRefs);
    }
}
