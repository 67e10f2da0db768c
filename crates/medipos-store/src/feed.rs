//! # Live Snapshot Feed
//!
//! Push-based subscription delivering a full refreshed snapshot on every
//! underlying change.
//!
//! ## Design
//! Built on `tokio::sync::watch`: the channel always holds the latest
//! value, late subscribers immediately see current state, and slow
//! consumers skip intermediate snapshots instead of queueing them. That
//! matches the feed contract exactly - consumers must tolerate receiving a
//! whole snapshot per change rather than deltas, with no bounded-latency
//! assumption.
//!
//! Subscriptions are explicit handles with deterministic teardown: there
//! is no ambient global listener state, and dropping a [`Subscription`]
//! detaches it immediately.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// The publishing side of a live feed.
///
/// Cloning shares the same underlying channel; services clone freely.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Feed<T> {
    /// Creates a feed seeded with an initial snapshot.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Feed { tx: Arc::new(tx) }
    }

    /// Publishes a refreshed snapshot, replacing the previous one.
    ///
    /// Never fails: with no active subscribers the value is simply held
    /// for the next one.
    pub fn publish(&self, snapshot: T) {
        self.tx.send_replace(snapshot);
    }

    /// Creates a new subscription observing the current snapshot and all
    /// future publications.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of currently attached subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A handle on a live feed.
///
/// Dropping the handle is the teardown; nothing else to clean up.
#[derive(Debug, Clone)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Returns the latest snapshot.
    pub fn latest(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Waits for the next publication after the last one seen.
    ///
    /// Returns `false` once the feed has been closed (publisher dropped).
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Converts the subscription into a `Stream` of snapshots, starting
    /// with the current one.
    pub fn into_stream(self) -> WatchStream<T> {
        WatchStream::new(self.rx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_initial_snapshot() {
        let feed = Feed::new(vec![1, 2, 3]);
        let sub = feed.subscribe();
        assert_eq!(sub.latest(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_publish_wakes_subscriber_with_full_snapshot() {
        let feed = Feed::new(0);
        let mut sub = feed.subscribe();

        feed.publish(7);
        assert!(sub.changed().await);
        assert_eq!(sub.latest(), 7);
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_to_latest() {
        // Intermediate snapshots are replaced, not queued; a consumer that
        // wakes late observes only the newest state.
        let feed = Feed::new(0);
        let mut sub = feed.subscribe();

        feed.publish(1);
        feed.publish(2);
        feed.publish(3);

        assert!(sub.changed().await);
        assert_eq!(sub.latest(), 3);
    }

    #[tokio::test]
    async fn test_drop_is_teardown() {
        let feed = Feed::new(0);
        let sub = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_changed_reports_closed_feed() {
        let feed = Feed::new(0);
        let mut sub = feed.subscribe();
        drop(feed);
        assert!(!sub.changed().await);
    }
}
