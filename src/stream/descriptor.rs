//! Stream descriptor
//!
//! A `Stream` describes one logical stream: a stable identifier plus a few
//! mutable attributes (caps, tags, flags, type). Streams are always handled
//! through `Arc<Stream>`; identity comparisons use `Arc::ptr_eq`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use super::caps::{Caps, TagList};
use super::notify::{HandlerId, NotifyHandler, NotifySource};
use super::types::{StreamFlags, StreamProperty, StreamType};

/// Mutable attributes of a stream
#[derive(Debug, Clone, Default)]
struct Attributes {
    caps: Option<Caps>,
    tags: Option<TagList>,
    stream_type: StreamType,
    flags: StreamFlags,
}

/// A logical media stream
pub struct Stream {
    /// Immutable identifier, unique within a collection
    stream_id: String,

    attrs: RwLock<Attributes>,

    notify: NotifySource,

    /// Back-reference handed to notification handlers
    this: Weak<Stream>,
}

impl Stream {
    /// Create a new stream
    ///
    /// If `stream_id` is `None` a random, process-unique id is generated.
    pub fn new(
        stream_id: Option<&str>,
        caps: Option<Caps>,
        stream_type: StreamType,
        flags: StreamFlags,
    ) -> Arc<Self> {
        let stream_id = match stream_id {
            Some(id) => id.to_owned(),
            None => generate_stream_id(),
        };

        Arc::new_cyclic(|this| Self {
            stream_id,
            attrs: RwLock::new(Attributes {
                caps,
                tags: None,
                stream_type,
                flags,
            }),
            notify: NotifySource::default(),
            this: this.clone(),
        })
    }

    /// Get the stream identifier
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Get the stream type
    pub fn stream_type(&self) -> StreamType {
        self.read().stream_type
    }

    /// Get the stream flags
    pub fn flags(&self) -> StreamFlags {
        self.read().flags
    }

    /// Get a copy of the current caps
    pub fn caps(&self) -> Option<Caps> {
        self.read().caps.clone()
    }

    /// Get a copy of the current tags
    pub fn tags(&self) -> Option<TagList> {
        self.read().tags.clone()
    }

    /// Set the caps; notifies `caps` if they changed
    pub fn set_caps(&self, caps: Option<Caps>) {
        let changed = {
            let mut attrs = self.write();
            if attrs.caps != caps {
                attrs.caps = caps;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify(StreamProperty::Caps);
        }
    }

    /// Set the tags; notifies `tags` if they changed
    pub fn set_tags(&self, tags: Option<TagList>) {
        let changed = {
            let mut attrs = self.write();
            if attrs.tags != tags {
                attrs.tags = tags;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify(StreamProperty::Tags);
        }
    }

    /// Set the flags; notifies `stream-flags` if they changed
    pub fn set_flags(&self, flags: StreamFlags) {
        let changed = {
            let mut attrs = self.write();
            let changed = attrs.flags != flags;
            attrs.flags = flags;
            changed
        };
        if changed {
            self.notify(StreamProperty::StreamFlags);
        }
    }

    /// Set the stream type; notifies `stream-type` if it changed
    pub fn set_stream_type(&self, stream_type: StreamType) {
        let changed = {
            let mut attrs = self.write();
            let changed = attrs.stream_type != stream_type;
            attrs.stream_type = stream_type;
            changed
        };
        if changed {
            self.notify(StreamProperty::StreamType);
        }
    }

    /// Connect a change handler
    ///
    /// The handler runs on the thread that changed the attribute, after the
    /// stream's internal lock has been released.
    pub fn connect_notify<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Arc<Stream>, StreamProperty) + Send + Sync + 'static,
    {
        let handler: NotifyHandler = Arc::new(handler);
        self.notify.connect(None, handler)
    }

    /// Connect a handler for changes of a single property
    pub fn connect_notify_property<F>(&self, property: StreamProperty, handler: F) -> HandlerId
    where
        F: Fn(&Arc<Stream>, StreamProperty) + Send + Sync + 'static,
    {
        let handler: NotifyHandler = Arc::new(handler);
        self.notify.connect(Some(property), handler)
    }

    /// Disconnect a change handler
    ///
    /// Returns false if no handler with this id was connected.
    pub fn disconnect_notify(&self, id: HandlerId) -> bool {
        self.notify.disconnect(id)
    }

    /// Number of connected change handlers
    pub fn notify_handler_count(&self) -> usize {
        self.notify.handler_count()
    }

    fn notify(&self, property: StreamProperty) {
        tracing::trace!(stream_id = %self.stream_id, property = %property, "Stream updated");

        // Upgrade fails only while the last reference is being dropped
        if let Some(this) = self.this.upgrade() {
            self.notify.emit(&this, property);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Attributes> {
        self.attrs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Attributes> {
        self.attrs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let attrs = self.read();
        f.debug_struct("Stream")
            .field("stream_id", &self.stream_id)
            .field("stream_type", &attrs.stream_type)
            .field("flags", &attrs.flags)
            .field("caps", &attrs.caps)
            .finish()
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.stream_id, self.stream_type())
    }
}

/// Generate a 32 hex digit id from a per-process seed and a counter
fn generate_stream_id() -> String {
    static SEED: OnceLock<u64> = OnceLock::new();
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let seed = *SEED.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        nanos ^ (u64::from(std::process::id()) << 32)
    });
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{:016x}{:016x}", seed, n)
}
