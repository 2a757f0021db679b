//! Generation service module.

mod http;
mod provider;
mod types;

pub use http::{HttpVideoService, HttpVideoServiceBuilder, DEFAULT_BASE_URL, SERVICE_URL_ENV};
pub use provider::VideoService;
pub(crate) use types::duration_ms;
pub use types::{GenerateVideoRequest, GeneratedArtifact, VIDEO_MIME_TYPE};
