//! Format Inspector
//!
//! Turns the engine's raw format list into the short, display-ready list the
//! user picks from.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::engine::{ExtractionEngine, RawFormat};
use crate::error::GrabError;

/// Containers offered to the user
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["mp4", "webm"];

const UNKNOWN_RESOLUTION: &str = "Unknown";

/// One selectable row of the summary page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormat {
    pub format_id: String,
    pub resolution: String,
    /// e.g. "10.0 MB (silent)"
    pub filesize: String,
    pub ext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    /// Highest quality first
    pub formats: Vec<DisplayFormat>,
    pub original_url: String,
}

/// Filter and relabel engine formats, highest quality first.
///
/// Keeps only mp4/webm descriptors with a known size; the engine lists
/// formats from worst to best, so the result is reversed.
pub fn shape_formats(raw: &[RawFormat]) -> Vec<DisplayFormat> {
    let mut formats: Vec<DisplayFormat> = raw
        .iter()
        .filter_map(|format| {
            let ext = format.ext.as_deref()?;
            if !ALLOWED_EXTENSIONS.contains(&ext) {
                return None;
            }

            let size = format.effective_size()?;
            let audio = if format.has_audio() {
                "has audio"
            } else {
                "silent"
            };

            Some(DisplayFormat {
                format_id: format.format_id.clone(),
                resolution: format
                    .resolution
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_RESOLUTION.to_string()),
                filesize: format!("{} ({audio})", size.to_megabyte_label()),
                ext: ext.to_string(),
            })
        })
        .collect();

    formats.reverse();
    formats
}

pub struct FormatInspector {
    engine: Arc<dyn ExtractionEngine>,
}

impl FormatInspector {
    pub fn new(engine: Arc<dyn ExtractionEngine>) -> Self {
        Self { engine }
    }

    /// Describe `url` without retrieving any media
    pub async fn inspect(&self, url: &str) -> Result<VideoSummary, GrabError> {
        let metadata = self.engine.fetch_metadata(url).await.map_err(|e| {
            warn!(engine = self.engine.name(), url, error = %e, "Inspection failed");
            GrabError::InspectionFailed(e.to_string())
        })?;

        let formats = shape_formats(&metadata.formats);
        info!(
            url,
            offered = metadata.formats.len(),
            shown = formats.len(),
            "Video inspected"
        );

        Ok(VideoSummary {
            title: metadata.title,
            thumbnail: metadata.thumbnail,
            duration: metadata.duration_string,
            formats,
            original_url: url.to_string(),
        })
    }
}
