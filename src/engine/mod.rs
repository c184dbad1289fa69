//! Extraction engine seam
//!
//! Everything that talks to the external media extractor lives behind
//! [`ExtractionEngine`]. The service only ever asks two questions of it:
//!
//! - [`ExtractionEngine::fetch_metadata`] - describe a URL without retrieving media
//! - [`ExtractionEngine::fetch_media`] - retrieve one format into a directory
//!
//! [`YtDlp`] is the production implementation, driving the `yt-dlp` binary
//! as a child process.

mod traits;
mod types;
mod ytdlp;

pub use traits::{EngineError, ExtractionEngine};
pub use types::{NO_AUDIO_CODEC, RawFormat, VideoMetadata};
pub use ytdlp::YtDlp;
