// ── Notification feed ──
//
// Bounded, most-recent-first sequence of alerts merged from the
// streaming channel. Deduplicated by event id when the server provides
// one. Connection-status and unknown events leave the feed untouched.

use std::collections::VecDeque;
use std::sync::Arc;

use bandly_api::stream::{ChannelEvent, Notification};

const DEFAULT_CAPACITY: usize = 100;

/// Per-session alert feed backing badges and notification lists.
#[derive(Debug)]
pub struct NotificationFeed {
    entries: VecDeque<Arc<Notification>>,
    capacity: usize,
    unread: usize,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotificationFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
            unread: 0,
        }
    }

    /// Merge one channel event. Returns `true` if the feed changed.
    pub fn apply(&mut self, event: &ChannelEvent) -> bool {
        match event {
            ChannelEvent::Notification(notification) => self.push(notification),
            ChannelEvent::Connected | ChannelEvent::Error { .. } => false,
        }
    }

    fn push(&mut self, notification: &Notification) -> bool {
        if let Some(id) = notification.id.as_deref() {
            let duplicate = self
                .entries
                .iter()
                .any(|existing| existing.id.as_deref() == Some(id));
            if duplicate {
                tracing::trace!(id, "dropping duplicate notification");
                return false;
            }
        }

        self.entries.push_front(Arc::new(notification.clone()));
        self.entries.truncate(self.capacity);
        self.unread = (self.unread + 1).min(self.entries.len());
        true
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Notification>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Badge count.
    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn mark_all_read(&mut self) {
        self.unread = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification(id: Option<&str>, kind: &str) -> ChannelEvent {
        ChannelEvent::Notification(Notification {
            id: id.map(String::from),
            kind: kind.to_owned(),
            message: None,
            payload: serde_json::Value::Null,
            received_at: Utc::now(),
        })
    }

    #[test]
    fn newest_entries_come_first() {
        let mut feed = NotificationFeed::default();
        feed.apply(&notification(Some("1"), "first"));
        feed.apply(&notification(Some("2"), "second"));

        let kinds: Vec<_> = feed.iter().map(|n| n.kind.clone()).collect();
        assert_eq!(kinds, vec!["second".to_owned(), "first".to_owned()]);
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut feed = NotificationFeed::default();
        assert!(feed.apply(&notification(Some("n-1"), "reminder.due")));
        assert!(!feed.apply(&notification(Some("n-1"), "reminder.due")));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn entries_without_ids_are_never_deduplicated() {
        let mut feed = NotificationFeed::default();
        assert!(feed.apply(&notification(None, "ping")));
        assert!(feed.apply(&notification(None, "ping")));
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn capacity_is_enforced_oldest_out() {
        let mut feed = NotificationFeed::with_capacity(3);
        for i in 0..5 {
            feed.apply(&notification(Some(&i.to_string()), &format!("k{i}")));
        }

        assert_eq!(feed.len(), 3);
        let kinds: Vec<_> = feed.iter().map(|n| n.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec!["k4".to_owned(), "k3".to_owned(), "k2".to_owned()]
        );
    }

    #[test]
    fn status_events_leave_the_feed_untouched() {
        let mut feed = NotificationFeed::default();
        feed.apply(&notification(Some("1"), "reminder.due"));

        assert!(!feed.apply(&ChannelEvent::Connected));
        assert!(!feed.apply(&ChannelEvent::Error {
            message: "stream read failed".into()
        }));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn mark_all_read_clears_the_badge() {
        let mut feed = NotificationFeed::default();
        feed.apply(&notification(Some("1"), "a"));
        feed.mark_all_read();
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.len(), 1);
    }
}
