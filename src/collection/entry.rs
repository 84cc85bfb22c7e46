//! Per-member record of a stream collection

use std::sync::Arc;

use crate::stream::{HandlerId, Stream};

/// Entry for a single top-level stream in a collection
///
/// Dropping the entry disconnects the relay handler from the member stream
/// and releases the stream and all its variants.
pub(super) struct CollectionEntry {
    /// Member stream
    pub(super) stream: Arc<Stream>,

    /// Cached stream id for lookups
    pub(super) stream_id: String,

    /// Variant streams, in the order they were added
    pub(super) variants: Vec<Arc<Stream>>,

    /// Relay handler connected on the member stream
    handler_id: HandlerId,
}

impl CollectionEntry {
    pub(super) fn new(stream: Arc<Stream>, handler_id: HandlerId) -> Self {
        Self {
            stream_id: stream.stream_id().to_owned(),
            stream,
            variants: Vec::new(),
            handler_id,
        }
    }

    /// Check if `candidate` is one of this entry's variants (by identity)
    pub(super) fn has_variant(&self, candidate: &Arc<Stream>) -> bool {
        self.variants.iter().any(|v| Arc::ptr_eq(v, candidate))
    }

    /// Check if a variant with the given id exists
    pub(super) fn has_variant_id(&self, stream_id: &str) -> bool {
        self.variants.iter().any(|v| v.stream_id() == stream_id)
    }
}

impl Drop for CollectionEntry {
    fn drop(&mut self) {
        self.stream.disconnect_notify(self.handler_id);
    }
}

impl std::fmt::Debug for CollectionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionEntry")
            .field("stream_id", &self.stream_id)
            .field(
                "variants",
                &self.variants.iter().map(|v| v.stream_id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{StreamFlags, StreamType};

    #[test]
    fn test_drop_disconnects_handler() {
        let stream = Stream::new(Some("a"), None, StreamType::Audio, StreamFlags::NONE);
        let handler_id = stream.connect_notify(|_, _| {});

        let entry = CollectionEntry::new(Arc::clone(&stream), handler_id);
        assert_eq!(entry.stream_id, "a");
        assert_eq!(stream.notify_handler_count(), 1);

        drop(entry);
        assert_eq!(stream.notify_handler_count(), 0);
        assert_eq!(Arc::strong_count(&stream), 1);
    }

    #[test]
    fn test_variant_identity() {
        let stream = Stream::new(Some("v"), None, StreamType::Video, StreamFlags::NONE);
        let handler_id = stream.connect_notify(|_, _| {});
        let mut entry = CollectionEntry::new(stream, handler_id);

        let v1 = Stream::new(Some("v1"), None, StreamType::Video, StreamFlags::NONE);
        // Same id, different stream object
        let lookalike = Stream::new(Some("v1"), None, StreamType::Video, StreamFlags::NONE);
        entry.variants.push(Arc::clone(&v1));

        assert!(entry.has_variant(&v1));
        assert!(!entry.has_variant(&lookalike));
        assert!(entry.has_variant_id("v1"));
        assert!(!entry.has_variant_id("v2"));
    }
}
