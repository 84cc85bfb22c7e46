//! Capabilities and tag descriptors attached to a stream

use bytes::Bytes;

/// Capabilities descriptor
///
/// A media type (e.g. `video/x-h264`) plus ordered string fields. Codec
/// configuration (SPS/PPS, AudioSpecificConfig, ...) is kept as `Bytes` so
/// clones share the allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caps {
    media_type: String,
    fields: Vec<(String, String)>,
    codec_data: Option<Bytes>,
}

impl Caps {
    /// Create caps for a media type with no fields
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            fields: Vec::new(),
            codec_data: None,
        }
    }

    /// Set a field, replacing any previous value with the same name
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Attach codec configuration data
    pub fn codec_data(mut self, data: Bytes) -> Self {
        self.codec_data = Some(data);
        self
    }

    /// Get the media type
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get the codec configuration data, if any
    pub fn get_codec_data(&self) -> Option<&Bytes> {
        self.codec_data.as_ref()
    }
}

impl std::fmt::Display for Caps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.media_type)?;
        for (name, value) in &self.fields {
            write!(f, ", {}={}", name, value)?;
        }
        Ok(())
    }
}

/// Ordered list of string tags (title, language-code, bitrate, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<(String, String)>,
}

impl TagList {
    /// Create an empty tag list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a tag
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.tags.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.tags.push((name, value)),
        }
    }

    /// Builder-style [`TagList::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a tag value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if there are no tags
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_fields() {
        let caps = Caps::new("audio/mpeg")
            .field("mpegversion", "4")
            .field("channels", "2")
            .field("channels", "6");

        assert_eq!(caps.media_type(), "audio/mpeg");
        assert_eq!(caps.get("mpegversion"), Some("4"));
        assert_eq!(caps.get("channels"), Some("6"));
        assert_eq!(caps.get("rate"), None);
        assert_eq!(caps.to_string(), "audio/mpeg, mpegversion=4, channels=6");
    }

    #[test]
    fn test_caps_codec_data_shared() {
        let data = Bytes::from_static(&[0x12, 0x10]);
        let caps = Caps::new("audio/mpeg").codec_data(data.clone());
        let copy = caps.clone();

        assert_eq!(copy.get_codec_data(), Some(&data));
        assert_eq!(caps, copy);
    }

    #[test]
    fn test_tag_list() {
        let mut tags = TagList::new().with("language-code", "en");
        tags.insert("title", "Commentary");
        tags.insert("language-code", "fr");

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("language-code"), Some("fr"));
        let names: Vec<_> = tags.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["language-code", "title"]);
    }
}
