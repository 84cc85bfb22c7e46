//! Stream descriptors
//!
//! The collection only relies on three things from a stream: a stable
//! identifier, a type tag, and a change notification source. This module
//! provides a concrete descriptor with exactly that surface plus the usual
//! attributes (caps, tags, flags).

pub mod caps;
pub mod descriptor;
pub mod notify;
pub mod types;

pub use caps::{Caps, TagList};
pub use descriptor::Stream;
pub use notify::{HandlerId, NotifyHandler};
pub use types::{StreamFlags, StreamProperty, StreamType};
