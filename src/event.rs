//! Announcement events and messages carrying a stream collection
//!
//! A fully built collection is published by attaching it to an [`Event`]
//! travelling downstream. Recipients read it back with the collection's
//! accessors. A stream-start event marks the beginning of one stream's data
//! and may carry the [`Stream`] it belongs to. Stream selection goes the
//! other way: an [`Event::select_streams`] names the chosen stream ids, and a
//! [`Message::streams_selected`] reports what was actually activated.
//!
//! Events and messages are cheap to clone (the collection is shared through
//! `Arc`) and can be fanned out with `tokio::sync::broadcast`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::collection::StreamCollection;
use crate::stream::Stream;

static NEXT_SEQNUM: AtomicU64 = AtomicU64::new(1);

fn next_seqnum() -> u64 {
    NEXT_SEQNUM.fetch_add(1, Ordering::Relaxed)
}

/// Type of event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Marks the start of a stream's data
    StreamStart,
    /// Announces the streams available from a source
    StreamCollection,
    /// Requests activation of a set of streams
    SelectStreams,
}

#[derive(Debug, Clone)]
enum EventPayload {
    StreamStart {
        stream_id: String,
        stream: Option<Arc<Stream>>,
    },
    StreamCollection(Arc<StreamCollection>),
    SelectStreams(Vec<String>),
}

/// An event sent through the pipeline
#[derive(Debug, Clone)]
pub struct Event {
    seqnum: u64,
    payload: EventPayload,
}

impl Event {
    /// Create a stream-start event for `stream_id`
    ///
    /// The event carries no [`Stream`] until [`Event::set_stream`] is called.
    pub fn stream_start(stream_id: impl Into<String>) -> Self {
        Self {
            seqnum: next_seqnum(),
            payload: EventPayload::StreamStart {
                stream_id: stream_id.into(),
                stream: None,
            },
        }
    }

    /// Attach the stream to a stream-start event
    ///
    /// Ignored (with a warning) on any other event type.
    pub fn set_stream(&mut self, stream: Arc<Stream>) {
        if let EventPayload::StreamStart { stream: slot, .. } = &mut self.payload {
            *slot = Some(stream);
            return;
        }

        tracing::warn!(
            event_type = ?self.event_type(),
            stream_id = %stream.stream_id(),
            "Only stream-start events carry a stream"
        );
    }

    /// Create an event announcing `collection`
    pub fn stream_collection(collection: Arc<StreamCollection>) -> Self {
        tracing::debug!(
            upstream_id = ?collection.upstream_id(),
            streams = collection.size(),
            "Announcing stream collection"
        );

        Self {
            seqnum: next_seqnum(),
            payload: EventPayload::StreamCollection(collection),
        }
    }

    /// Create an event selecting the streams with the given ids
    ///
    /// Returns `None` if `stream_ids` is empty.
    pub fn select_streams(stream_ids: Vec<String>) -> Option<Self> {
        if stream_ids.is_empty() {
            tracing::warn!("Refusing to select an empty list of streams");
            return None;
        }

        Some(Self {
            seqnum: next_seqnum(),
            payload: EventPayload::SelectStreams(stream_ids),
        })
    }

    /// Get the event type
    pub fn event_type(&self) -> EventType {
        match self.payload {
            EventPayload::StreamStart { .. } => EventType::StreamStart,
            EventPayload::StreamCollection(_) => EventType::StreamCollection,
            EventPayload::SelectStreams(_) => EventType::SelectStreams,
        }
    }

    /// Get the sequence number
    pub fn seqnum(&self) -> u64 {
        self.seqnum
    }

    /// Get the stream id, if this is a stream-start event
    pub fn parse_stream_start(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::StreamStart { stream_id, .. } => Some(stream_id),
            _ => None,
        }
    }

    /// Get the stream attached to a stream-start event, if any
    pub fn parse_stream(&self) -> Option<&Arc<Stream>> {
        match &self.payload {
            EventPayload::StreamStart { stream, .. } => stream.as_ref(),
            _ => None,
        }
    }

    /// Get the announced collection, if this is a stream-collection event
    pub fn parse_stream_collection(&self) -> Option<&Arc<StreamCollection>> {
        match &self.payload {
            EventPayload::StreamCollection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Get the selected stream ids, if this is a select-streams event
    pub fn parse_select_streams(&self) -> Option<&[String]> {
        match &self.payload {
            EventPayload::SelectStreams(ids) => Some(ids),
            _ => None,
        }
    }
}

/// A message posted back to the application
#[derive(Debug, Clone)]
pub struct Message {
    seqnum: u64,
    collection: Arc<StreamCollection>,
    streams: Vec<Arc<Stream>>,
}

impl Message {
    /// Create a streams-selected message for `collection`
    ///
    /// Use [`Message::add_stream`] to record the activated streams.
    pub fn streams_selected(collection: Arc<StreamCollection>) -> Self {
        Self {
            seqnum: next_seqnum(),
            collection,
            streams: Vec::new(),
        }
    }

    /// Record an activated stream
    pub fn add_stream(&mut self, stream: Arc<Stream>) {
        tracing::debug!(stream_id = %stream.stream_id(), "Stream selected");
        self.streams.push(stream);
    }

    /// Get the sequence number
    pub fn seqnum(&self) -> u64 {
        self.seqnum
    }

    /// Get the collection the selection was made from
    pub fn collection(&self) -> &Arc<StreamCollection> {
        &self.collection
    }

    /// Get the activated streams
    pub fn streams(&self) -> &[Arc<Stream>] {
        &self.streams
    }
}
