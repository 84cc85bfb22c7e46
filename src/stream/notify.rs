//! Per-stream change notification source
//!
//! Handlers are plain callbacks invoked synchronously on the thread that
//! changed the attribute. The handler list is snapshotted before dispatch so
//! a handler may connect or disconnect handlers (including itself) without
//! deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::descriptor::Stream;
use super::types::StreamProperty;

/// Callback invoked when a stream attribute changes
pub type NotifyHandler = Arc<dyn Fn(&Arc<Stream>, StreamProperty) + Send + Sync>;

/// Identifies a connected handler so it can be disconnected later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

impl HandlerId {
    fn next() -> Self {
        HandlerId(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

struct Connection {
    id: HandlerId,
    /// Only properties equal to this are dispatched, if set
    filter: Option<StreamProperty>,
    handler: NotifyHandler,
}

/// Set of connected change handlers
#[derive(Default)]
pub(crate) struct NotifySource {
    handlers: Mutex<Vec<Connection>>,
}

impl NotifySource {
    pub(crate) fn connect(
        &self,
        filter: Option<StreamProperty>,
        handler: NotifyHandler,
    ) -> HandlerId {
        let id = HandlerId::next();
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Connection {
                id,
                filter,
                handler,
            });
        id
    }

    /// Returns false if the handler was not connected
    pub(crate) fn disconnect(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|c| c.id != id);
        handlers.len() != before
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub(crate) fn emit(&self, stream: &Arc<Stream>, property: StreamProperty) {
        let snapshot: Vec<NotifyHandler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| c.filter.map_or(true, |p| p == property))
            .map(|c| Arc::clone(&c.handler))
            .collect();

        for handler in snapshot {
            handler(stream, property);
        }
    }
}

impl std::fmt::Debug for NotifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySource")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
