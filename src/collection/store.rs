//! Stream collection implementation
//!
//! An ordered set of top-level streams, their variants, and the relay that
//! forwards member attribute changes to collection observers.

use std::sync::Arc;

use crate::stream::{HandlerId, NotifyHandler, Stream, StreamProperty};

use super::config::CollectionConfig;
use super::entry::CollectionEntry;
use super::error::CollectionError;
use super::notify::{relay_handler, NotifyReceiver, Relay};

/// Ordered collection of streams
///
/// Mutation (`add_stream`, `add_variant`) takes `&mut self`, so a collection
/// is built by a single owner and then shared read-only, typically as
/// `Arc<StreamCollection>` attached to an [`Event`](crate::event::Event).
///
/// Lookups by id resolve to the first entry with that id; duplicate ids are
/// allowed.
pub struct StreamCollection {
    /// Id of the stream this collection describes, fixed at construction
    upstream_id: Option<String>,

    /// Top-level streams in insertion order
    entries: Vec<CollectionEntry>,

    /// Fan-out of member notifications to collection observers
    relay: Arc<Relay>,

    /// Configuration
    config: CollectionConfig,
}

impl StreamCollection {
    /// Create an empty collection with default configuration
    pub fn new(upstream_id: Option<&str>) -> Self {
        Self::with_config(upstream_id, CollectionConfig::default())
    }

    /// Create an empty collection with custom configuration
    pub fn with_config(upstream_id: Option<&str>, config: CollectionConfig) -> Self {
        Self {
            upstream_id: upstream_id.map(str::to_owned),
            entries: Vec::new(),
            relay: Arc::new(Relay::new(config.notify_capacity)),
            config,
        }
    }

    /// Get the collection configuration
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Get the upstream id
    pub fn upstream_id(&self) -> Option<&str> {
        self.upstream_id.as_deref()
    }

    /// Add a stream to the end of the collection
    ///
    /// The collection keeps the stream alive and relays its attribute
    /// changes to collection observers. Ids are not deduplicated.
    pub fn add_stream(&mut self, stream: Arc<Stream>) {
        tracing::debug!(
            upstream_id = ?self.upstream_id,
            stream_id = %stream.stream_id(),
            stream_type = %stream.stream_type(),
            "Adding stream"
        );

        let handler_id = stream.connect_notify(relay_handler(Arc::clone(&self.relay)));
        self.entries.push(CollectionEntry::new(stream, handler_id));
    }

    /// Number of top-level streams (variants are not counted)
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection has no streams
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the stream at `index`, in insertion order
    pub fn get_stream(&self, index: usize) -> Option<&Arc<Stream>> {
        self.entries.get(index).map(|e| &e.stream)
    }

    /// Get the first top-level stream with the given id
    pub fn find_stream(&self, stream_id: &str) -> Option<&Arc<Stream>> {
        self.find_entry(stream_id).map(|e| &e.stream)
    }

    /// Iterate over top-level streams in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Stream>> {
        self.entries.iter().map(|e| &e.stream)
    }

    /// Add `variant` as an alternate rendition of the stream `stream_id`
    ///
    /// The variant must have the same stream type as its parent. Variants are
    /// kept alive by the collection but are not relayed to observers, and the
    /// same variant may be added more than once.
    pub fn add_variant(
        &mut self,
        stream_id: &str,
        variant: Arc<Stream>,
    ) -> Result<(), CollectionError> {
        let entry = match self.entries.iter_mut().find(|e| e.stream_id == stream_id) {
            Some(entry) => entry,
            None => {
                tracing::error!(
                    stream_id = %stream_id,
                    "The collection doesn't contain the stream"
                );
                return Err(CollectionError::StreamNotFound(stream_id.to_owned()));
            }
        };

        let expected = entry.stream.stream_type();
        let actual = variant.stream_type();
        if expected != actual {
            tracing::warn!(
                stream_id = %stream_id,
                variant_id = %variant.stream_id(),
                expected = %expected,
                actual = %actual,
                "Variant isn't of the same type as the parent"
            );
            return Err(CollectionError::TypeMismatch {
                stream_id: stream_id.to_owned(),
                expected,
                actual,
            });
        }

        tracing::debug!(
            stream_id = %stream_id,
            variant_id = %variant.stream_id(),
            variants = entry.variants.len() + 1,
            "Adding variant"
        );
        entry.variants.push(variant);

        Ok(())
    }

    /// Check if `candidate` is a variant of the stream `stream_id`
    ///
    /// Compares stream identity, not attributes: a different stream object
    /// with the same id is not a variant.
    pub fn is_variant_for(&self, candidate: &Arc<Stream>, stream_id: &str) -> bool {
        self.find_entry(stream_id)
            .map_or(false, |e| e.has_variant(candidate))
    }

    /// Get the variants of the stream `stream_id`, in the order they were added
    ///
    /// Returns an empty slice for a known stream without variants and
    /// `StreamNotFound` for an unknown id.
    pub fn get_variants(&self, stream_id: &str) -> Result<&[Arc<Stream>], CollectionError> {
        self.find_entry(stream_id)
            .map(|e| e.variants.as_slice())
            .ok_or_else(|| CollectionError::StreamNotFound(stream_id.to_owned()))
    }

    /// Get the id of the top-level stream that `variant_id` is a variant of
    pub fn get_variant_of(&self, variant_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.has_variant_id(variant_id))
            .map(|e| e.stream_id.as_str())
    }

    /// Connect a handler for attribute changes on any member stream
    ///
    /// With `filter` set, only changes of that attribute are delivered. The
    /// handler runs synchronously on the thread that changed the attribute,
    /// once per change; nothing is queued or dropped.
    pub fn connect_stream_notify<F>(
        &self,
        filter: Option<StreamProperty>,
        handler: F,
    ) -> HandlerId
    where
        F: Fn(&Arc<Stream>, StreamProperty) + Send + Sync + 'static,
    {
        let handler: NotifyHandler = Arc::new(handler);
        self.relay.connect(filter, handler)
    }

    /// Disconnect a handler connected with [`connect_stream_notify`]
    ///
    /// Returns false if no handler with this id was connected.
    ///
    /// [`connect_stream_notify`]: StreamCollection::connect_stream_notify
    pub fn disconnect_stream_notify(&self, id: HandlerId) -> bool {
        self.relay.disconnect(id)
    }

    /// Subscribe to attribute changes on any member stream
    ///
    /// The receiver is backed by a channel of `notify_capacity` slots. If it
    /// falls further behind, the oldest notifications are lost and it sees
    /// `RecvError::Lagged`. Use [`connect_stream_notify`] when every change
    /// must be seen.
    ///
    /// [`connect_stream_notify`]: StreamCollection::connect_stream_notify
    pub fn subscribe(&self) -> NotifyReceiver {
        self.relay.subscribe(None)
    }

    /// Subscribe to changes of one attribute on any member stream
    ///
    /// Same delivery guarantees as [`subscribe`](StreamCollection::subscribe).
    pub fn subscribe_property(&self, property: StreamProperty) -> NotifyReceiver {
        self.relay.subscribe(Some(property))
    }

    /// Number of connected handlers plus active receivers
    pub fn observer_count(&self) -> usize {
        self.relay.observer_count()
    }

    fn find_entry(&self, stream_id: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|e| e.stream_id == stream_id)
    }
}

impl Drop for StreamCollection {
    fn drop(&mut self) {
        tracing::debug!(
            upstream_id = ?self.upstream_id,
            streams = self.entries.len(),
            "Releasing collection"
        );
        // Entries disconnect their relay handlers on drop
        self.entries.clear();
    }
}

impl std::fmt::Debug for StreamCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCollection")
            .field("upstream_id", &self.upstream_id)
            .field("entries", &self.entries)
            .finish()
    }
}
