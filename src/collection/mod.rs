//! Stream collection
//!
//! A collection owns an ordered list of top-level streams, each with its own
//! list of variants, and relays attribute changes of the top-level streams to
//! collection observers: synchronous handlers, then `tokio::sync::broadcast`
//! receivers.
//!
//! # Architecture
//!
//! ```text
//!                     StreamCollection
//!              ┌──────────────────────────────┐
//!              │ entries: Vec<CollectionEntry{│
//!              │   stream,                    │
//!              │   stream_id,                 │
//!              │   variants: Vec<Arc<Stream>>,│
//!              │ }>                           │
//!              │ relay: Arc<Relay {           │
//!              │   observers, tx,             │
//!              │ }>                           │
//!              └───────┬──────────────┬───────┘
//!                      │              │
//!         connect_notify()       connect_stream_notify() / subscribe()
//!                      │              │
//!                      ▼              ▼
//!   Stream::set_caps() ──► relay ──► handler(stream, property)
//!                                └─► NotifyReceiver::recv()
//! ```
//!
//! Variants are owned by the collection but never connected to the relay.

pub mod config;
mod entry;
pub mod error;
pub mod notify;
pub mod store;

pub use config::CollectionConfig;
pub use error::CollectionError;
pub use notify::{NotifyReceiver, StreamNotify};
pub use store::StreamCollection;
