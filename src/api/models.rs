//! Request and response bodies for the vidgrab HTTP surface.
//!
//! The browser flow posts urlencoded forms:
//! - `POST /` with [`InspectForm`] renders the summary page
//! - `POST /download_file` with [`DownloadForm`] streams the file back
//!
//! `POST /api/inspect` accepts the same [`InspectForm`] fields as JSON and
//! returns a [`crate::inspector::VideoSummary`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InspectForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DownloadForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub format_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
