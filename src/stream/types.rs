//! Stream classification and flag types

/// Kind of content carried by a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamType {
    /// Type not known (yet)
    #[default]
    Unknown,
    /// Audio stream
    Audio,
    /// Video stream
    Video,
    /// Container stream (e.g. muxed content not yet demuxed)
    Container,
    /// Text/subtitle stream
    Text,
}

impl StreamType {
    /// Get the display name of the stream type
    pub fn name(self) -> &'static str {
        match self {
            StreamType::Unknown => "unknown",
            StreamType::Audio => "audio",
            StreamType::Video => "video",
            StreamType::Container => "container",
            StreamType::Text => "text",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Stream flags
///
/// A small bit set. `SELECT` and `UNSELECT` are hints to the selection logic
/// about whether the stream should be picked by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamFlags(u32);

impl StreamFlags {
    /// No flags set
    pub const NONE: StreamFlags = StreamFlags(0);
    /// Stream is sparse (e.g. subtitles)
    pub const SPARSE: StreamFlags = StreamFlags(1 << 0);
    /// Stream should be selected by default
    pub const SELECT: StreamFlags = StreamFlags(1 << 1);
    /// Stream should not be selected by default
    pub const UNSELECT: StreamFlags = StreamFlags(1 << 2);

    /// Raw bit representation
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Check whether all flags in `other` are set
    pub fn contains(self, other: StreamFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether no flag is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for StreamFlags {
    type Output = StreamFlags;

    fn bitor(self, rhs: StreamFlags) -> StreamFlags {
        StreamFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for StreamFlags {
    fn bitor_assign(&mut self, rhs: StreamFlags) {
        self.0 |= rhs.0;
    }
}

/// Observable stream attribute
///
/// Carried by change notifications so observers know which attribute changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamProperty {
    /// Capabilities descriptor
    Caps,
    /// Tag list
    Tags,
    /// Stream flags
    StreamFlags,
    /// Stream type
    StreamType,
}

impl StreamProperty {
    /// Get the property name as used in notifications and logs
    pub fn name(self) -> &'static str {
        match self {
            StreamProperty::Caps => "caps",
            StreamProperty::Tags => "tags",
            StreamProperty::StreamFlags => "stream-flags",
            StreamProperty::StreamType => "stream-type",
        }
    }

    /// Look up a property by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "caps" => Some(StreamProperty::Caps),
            "tags" => Some(StreamProperty::Tags),
            "stream-flags" => Some(StreamProperty::StreamFlags),
            "stream-type" => Some(StreamProperty::StreamType),
            _ => None,
        }
    }
}

impl std::fmt::Display for StreamProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
