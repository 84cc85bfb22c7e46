//! Stream collections for media pipelines
//!
//! A [`StreamCollection`] is the ordered set of logical streams (audio, video,
//! text, ...) a source makes available, together with the variants
//! (alternate renditions) of each of them. It is built once per topology
//! change, then shared read-only with everyone who needs it.
//!
//! # Example
//!
//! ```
//! use stream_collection::{Caps, Stream, StreamCollection, StreamFlags, StreamType};
//!
//! let mut collection = StreamCollection::new(Some("demuxer-0"));
//!
//! let video = Stream::new(Some("video"), None, StreamType::Video, StreamFlags::NONE);
//! let hd = Stream::new(
//!     Some("video-1080p"),
//!     Some(Caps::new("video/x-h264").field("height", "1080")),
//!     StreamType::Video,
//!     StreamFlags::NONE,
//! );
//!
//! collection.add_stream(video);
//! collection.add_variant("video", hd).unwrap();
//!
//! assert_eq!(collection.size(), 1);
//! assert_eq!(collection.get_variant_of("video-1080p"), Some("video"));
//! ```

pub mod collection;
pub mod event;
pub mod stream;

pub use collection::{
    CollectionConfig, CollectionError, NotifyReceiver, StreamCollection, StreamNotify,
};
pub use event::{Event, EventType, Message};
pub use stream::{Caps, HandlerId, Stream, StreamFlags, StreamProperty, StreamType, TagList};
