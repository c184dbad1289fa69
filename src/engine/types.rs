use serde::{Deserialize, Serialize};

use crate::humanize::ByteSize;

/// Codec value the engine uses for "this stream has no audio"
pub const NO_AUDIO_CODEC: &str = "none";

/// Metadata returned by the engine for one URL
///
/// Only the fields the service shows are decoded; the rest of the engine's
/// JSON is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration_string: Option<String>,
    /// Engine order, lowest quality first
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One format descriptor as enumerated by the engine
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<ByteSize>,
    #[serde(default)]
    pub filesize_approx: Option<ByteSize>,
}

impl RawFormat {
    /// Exact size if known, otherwise the estimate. Zero means unknown.
    pub fn effective_size(&self) -> Option<ByteSize> {
        self.filesize
            .filter(|size| size.as_u64() > 0)
            .or(self.filesize_approx)
            .filter(|size| size.as_u64() > 0)
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some(NO_AUDIO_CODEC)
    }
}
