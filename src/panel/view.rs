//! Render-ready snapshot of the panel.

use crate::lesson::Lesson;
use crate::panel::state::{PanelState, SubmissionState};
use crate::service::VIDEO_MIME_TYPE;
use serde::Serialize;
use std::fmt::Write;

/// Trigger label while a submission is outstanding.
pub const BUSY_LABEL: &str = "Generating...";

/// Trigger label otherwise.
pub const IDLE_LABEL: &str = "Generate Video";

/// A playback element pointing at a generated video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoElement {
    /// Playback URL.
    pub src: String,
    /// Media type of the source, always `video/mp4`.
    pub mime_type: &'static str,
}

/// What the panel looks like at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    /// Free text as typed.
    pub prompt: String,
    /// Current submission step.
    pub submission: SubmissionState,
    /// [`BUSY_LABEL`] while in flight, else [`IDLE_LABEL`].
    pub trigger_label: &'static str,
    /// Disabled exactly while a submission is in flight.
    pub trigger_enabled: bool,
    /// Error text to show, if any.
    pub error: Option<String>,
    /// Playback element, present after a successful generation.
    pub video: Option<VideoElement>,
}

impl From<&PanelState> for PanelView {
    fn from(state: &PanelState) -> Self {
        let busy = state.is_in_flight();
        Self {
            prompt: state.prompt.clone(),
            submission: state.submission,
            trigger_label: if busy { BUSY_LABEL } else { IDLE_LABEL },
            trigger_enabled: !busy,
            error: state.error.clone(),
            video: state.video_url.as_ref().map(|src| VideoElement {
                src: src.clone(),
                mime_type: VIDEO_MIME_TYPE,
            }),
        }
    }
}

impl PanelView {
    /// Renders the panel as plain text for a terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Gurukul TTV Lesson");
        let _ = writeln!(out);

        let lessons: Vec<_> = Lesson::ALL.iter().map(Lesson::key).collect();
        let _ = writeln!(out, "Lessons: {}", lessons.join(" | "));
        if self.prompt.is_empty() {
            let _ = writeln!(out, "Prompt:  (empty)");
        } else {
            let _ = writeln!(out, "Prompt:  {}", self.prompt);
        }

        let marker = if self.trigger_enabled { "" } else { " (disabled)" };
        let _ = writeln!(out, "[ {} ]{}", self.trigger_label, marker);

        if let Some(error) = &self.error {
            let _ = writeln!(out, "Error: {error}");
        }
        if let Some(video) = &self.video {
            let _ = writeln!(out, "Video ({}): {}", video.mime_type, video.src);
        }
        out
    }
}
