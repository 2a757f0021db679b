//! Generation service trait.

use crate::error::Result;
use crate::playback;
use crate::service::types::{GenerateVideoRequest, GeneratedArtifact};
use async_trait::async_trait;

/// A collaborator that turns prompts into playable videos.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Sends one generation request and returns the produced artifact.
    ///
    /// Implementations must not retry.
    async fn generate_video(&self, request: &GenerateVideoRequest) -> Result<GeneratedArtifact>;

    /// Downloads the video stored under `filename`.
    async fn fetch_video(&self, filename: &str) -> Result<Vec<u8>>;

    /// Base URL that playback URLs are composed against.
    fn base_url(&self) -> &str;

    /// Returns the streaming URL for `filename`.
    fn playback_url(&self, filename: &str) -> String {
        playback::playback_url(self.base_url(), filename)
    }
}
