//! Request and response types for the generation service.

use crate::playback;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// MIME type of every video the service produces.
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Converts an elapsed time to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(elapsed: Duration) -> u64 {
    elapsed.as_millis().try_into().unwrap_or(u64::MAX)
}

/// Body of `POST /generate-video`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateVideoRequest {
    /// The prompt, sent exactly as resolved (no trimming).
    pub prompt: String,
}

impl GenerateVideoRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Success body of `POST /generate-video`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateVideoResponse {
    pub(crate) video_path: String,
}

/// A video reference returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// Server-side path of the generated file.
    pub video_path: String,
    /// Round-trip time of the generation request in milliseconds.
    pub duration_ms: Option<u64>,
}

impl GeneratedArtifact {
    /// Creates an artifact for the given service path.
    pub fn new(video_path: impl Into<String>) -> Self {
        Self {
            video_path: video_path.into(),
            duration_ms: None,
        }
    }

    /// Sets the measured request duration.
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Returns the filename the video is streamed under.
    pub fn filename(&self) -> &str {
        playback::filename_from_video_path(&self.video_path)
    }
}
