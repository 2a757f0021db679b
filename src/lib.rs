#![warn(missing_docs)]
//! Gurukul TTV - text-to-video lessons.
//!
//! This crate is the client side of the Gurukul lesson generator: it turns a
//! free-text prompt or one of the built-in lessons into a request against the
//! generation service and derives the URL the resulting video streams from.
//!
//! # Quick Start
//!
//! ```no_run
//! use gurukul_ttv::{HttpVideoService, PromptVideoPanel};
//!
//! #[tokio::main]
//! async fn main() -> gurukul_ttv::Result<()> {
//!     let service = HttpVideoService::builder().build()?;
//!     let panel = PromptVideoPanel::new(service);
//!
//!     let outcome = panel.select_lesson("water_cycle").await;
//!     if let Some(url) = outcome.video_url() {
//!         println!("Watch: {url}");
//!     }
//!     print!("{}", panel.snapshot().render_text());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`panel`]: the submission state machine and its render snapshot
//! - [`service`]: the generation service trait and its HTTP client
//! - [`lesson`]: the lesson catalog
//! - [`playback`]: filename and playback URL derivation
//! - [`bench`]: sequential timing runs against a service
//!
//! # Features
//!
//! - `cli` (default): the `gurukul-ttv` command-line interface

mod error;

pub mod bench;
pub mod lesson;
pub mod panel;
pub mod playback;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export error types at crate root
pub use error::{
    Result, TtvError, GENERATION_FAILED_MESSAGE, UNKNOWN_LESSON_MESSAGE, VALIDATION_MESSAGE,
};

pub use lesson::{Lesson, PromptSource};
pub use panel::{PanelView, PromptVideoPanel, SubmissionState, SubmitOutcome};
pub use service::{
    GenerateVideoRequest, GeneratedArtifact, HttpVideoService, HttpVideoServiceBuilder,
    VideoService, DEFAULT_BASE_URL,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, TtvError};
    pub use crate::lesson::{Lesson, PromptSource};
    pub use crate::panel::{PanelView, PromptVideoPanel, SubmitOutcome};
    pub use crate::service::{HttpVideoService, VideoService};
}
