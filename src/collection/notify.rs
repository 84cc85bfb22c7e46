//! Collection-level change relay
//!
//! Every top-level member stream gets one handler that forwards its change
//! notifications to the collection's observers. Observers register once on
//! the collection instead of once per stream.
//!
//! There are two ways to observe:
//! - handlers connected with `connect_stream_notify`, called synchronously on
//!   the thread that changed the attribute. Every change is delivered.
//! - `NotifyReceiver`s from `subscribe`, backed by a bounded
//!   `tokio::sync::broadcast` channel. A receiver that falls more than
//!   `notify_capacity` notifications behind loses the oldest ones and sees
//!   `RecvError::Lagged`.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::stream::notify::{NotifyHandler, NotifySource};
use crate::stream::{HandlerId, Stream, StreamProperty};

/// A relayed attribute change on a member stream
#[derive(Debug, Clone)]
pub struct StreamNotify {
    /// Member stream whose attribute changed
    pub stream: Arc<Stream>,
    /// Attribute that changed
    pub property: StreamProperty,
}

/// Receiver for relayed notifications
///
/// Optionally filtered on a single property, in which case notifications for
/// other properties are skipped.
#[derive(Debug)]
pub struct NotifyReceiver {
    rx: broadcast::Receiver<StreamNotify>,
    filter: Option<StreamProperty>,
}

impl NotifyReceiver {
    fn new(rx: broadcast::Receiver<StreamNotify>, filter: Option<StreamProperty>) -> Self {
        Self { rx, filter }
    }

    /// Property this receiver is filtered on, if any
    pub fn filter(&self) -> Option<StreamProperty> {
        self.filter
    }

    /// Wait for the next matching notification
    ///
    /// Returns `RecvError::Closed` once the collection has been dropped and
    /// all pending notifications were consumed.
    pub async fn recv(&mut self) -> Result<StreamNotify, RecvError> {
        loop {
            let notify = self.rx.recv().await?;
            if self.matches(&notify) {
                return Ok(notify);
            }
        }
    }

    /// Take the next matching notification without waiting
    pub fn try_recv(&mut self) -> Result<StreamNotify, TryRecvError> {
        loop {
            let notify = self.rx.try_recv()?;
            if self.matches(&notify) {
                return Ok(notify);
            }
        }
    }

    fn matches(&self, notify: &StreamNotify) -> bool {
        self.filter.map_or(true, |p| p == notify.property)
    }
}

/// Fan-out point shared by the collection and its member stream handlers
///
/// Dropped once the collection and every member handler are gone, which
/// closes the broadcast channel and releases the connected observers.
pub(super) struct Relay {
    observers: NotifySource,
    tx: broadcast::Sender<StreamNotify>,
}

impl Relay {
    pub(super) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            observers: NotifySource::default(),
            tx,
        }
    }

    pub(super) fn connect(
        &self,
        filter: Option<StreamProperty>,
        handler: NotifyHandler,
    ) -> HandlerId {
        self.observers.connect(filter, handler)
    }

    pub(super) fn disconnect(&self, id: HandlerId) -> bool {
        self.observers.disconnect(id)
    }

    pub(super) fn subscribe(&self, filter: Option<StreamProperty>) -> NotifyReceiver {
        NotifyReceiver::new(self.tx.subscribe(), filter)
    }

    pub(super) fn observer_count(&self) -> usize {
        self.observers.handler_count() + self.tx.receiver_count()
    }

    fn forward(&self, stream: &Arc<Stream>, property: StreamProperty) {
        tracing::debug!(
            stream_id = %stream.stream_id(),
            property = %property,
            "Stream updated"
        );

        self.observers.emit(stream, property);

        // Err only means there are no receivers right now
        let _ = self.tx.send(StreamNotify {
            stream: Arc::clone(stream),
            property,
        });
    }
}

/// Build the handler connected to each member stream
pub(super) fn relay_handler(
    relay: Arc<Relay>,
) -> impl Fn(&Arc<Stream>, StreamProperty) + Send + Sync + 'static {
    move |stream: &Arc<Stream>, property: StreamProperty| relay.forward(stream, property)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::stream::{StreamFlags, StreamType};

    #[test]
    fn test_filtered_receiver_skips_other_properties() {
        let relay = Arc::new(Relay::new(8));
        let mut caps_rx = relay.subscribe(Some(StreamProperty::Caps));
        let stream = Stream::new(Some("a"), None, StreamType::Audio, StreamFlags::NONE);
        assert_eq!(caps_rx.filter(), Some(StreamProperty::Caps));

        let handler = relay_handler(Arc::clone(&relay));
        handler(&stream, StreamProperty::Tags);
        handler(&stream, StreamProperty::Caps);

        let notify = caps_rx.try_recv().unwrap();
        assert_eq!(notify.property, StreamProperty::Caps);
        assert!(Arc::ptr_eq(&notify.stream, &stream));
        assert_eq!(caps_rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn test_closed_after_relay_dropped() {
        let relay = Arc::new(Relay::new(8));
        let mut all_rx = relay.subscribe(None);
        assert_eq!(all_rx.filter(), None);
        drop(relay_handler(relay));

        assert_eq!(all_rx.try_recv().unwrap_err(), TryRecvError::Closed);
    }

    #[test]
    fn test_observers_see_every_change_past_capacity() {
        let relay = Arc::new(Relay::new(2));
        let stream = Stream::new(Some("a"), None, StreamType::Audio, StreamFlags::NONE);
        let seen = Arc::new(AtomicUsize::new(0));
        let mut rx = relay.subscribe(None);

        let counter = Arc::clone(&seen);
        relay.connect(
            None,
            Arc::new(move |_: &Arc<Stream>, _: StreamProperty| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        assert_eq!(relay.observer_count(), 2);

        let handler = relay_handler(Arc::clone(&relay));
        for _ in 0..10 {
            handler(&stream, StreamProperty::StreamFlags);
        }

        assert_eq!(seen.load(Ordering::Relaxed), 10);
        // The broadcast receiver only keeps the latest `capacity` notifications
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Lagged(8));
    }
}
