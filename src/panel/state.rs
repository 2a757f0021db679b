//! Panel state and its transitions.

use crate::error::{TtvError, GENERATION_FAILED_MESSAGE};
use serde::Serialize;

/// Where the current submission stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Waiting on the generation service.
    InFlight,
    /// The last submission produced a video.
    Succeeded,
    /// The last submission failed remotely.
    Failed,
}

/// Everything the panel shows, owned by one panel instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    /// Free text as typed.
    pub prompt: String,
    /// Current step of the submission state machine.
    pub submission: SubmissionState,
    /// User-visible error text.
    pub error: Option<String>,
    /// Playback URL of the last successful generation.
    pub video_url: Option<String>,
}

impl PanelState {
    /// True while a submission is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.submission == SubmissionState::InFlight
    }

    /// Replaces the free text verbatim.
    pub fn edit_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// Records a local validation failure. Submission state and any shown
    /// video are left alone.
    pub fn reject(&mut self, err: &TtvError) {
        self.error = Some(err.user_message().to_string());
    }

    /// Idle/Succeeded/Failed -> InFlight.
    pub fn begin(&mut self) {
        self.submission = SubmissionState::InFlight;
        self.error = None;
        self.video_url = None;
    }

    /// InFlight -> Succeeded.
    pub fn succeed(&mut self, video_url: String) {
        self.submission = SubmissionState::Succeeded;
        self.error = None;
        self.video_url = Some(video_url);
    }

    /// InFlight -> Failed.
    pub fn fail(&mut self) {
        self.submission = SubmissionState::Failed;
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
        self.video_url = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = PanelState::default();
        assert_eq!(state.submission, SubmissionState::Idle);
        assert!(state.prompt.is_empty());
        assert!(state.error.is_none());
        assert!(state.video_url.is_none());
        assert!(!state.is_in_flight());
    }

    #[test]
    fn test_edit_prompt_is_verbatim() {
        let mut state = PanelState::default();
        state.edit_prompt("  rain over the hills \n");
        assert_eq!(state.prompt, "  rain over the hills \n");
    }

    #[test]
    fn test_begin_clears_previous_outcome() {
        let mut state = PanelState::default();
        state.begin();
        state.succeed("http://localhost:5000/video/a.mp4".into());
        state.begin();
        assert!(state.is_in_flight());
        assert!(state.video_url.is_none());

        state.fail();
        state.begin();
        assert!(state.error.is_none());
    }

    #[test]
    fn test_fail_clears_video() {
        let mut state = PanelState::default();
        state.succeed("http://localhost:5000/video/a.mp4".into());
        state.fail();
        assert_eq!(state.submission, SubmissionState::Failed);
        assert_eq!(state.error.as_deref(), Some("Failed to generate video"));
        assert!(state.video_url.is_none());
    }

    #[test]
    fn test_reject_keeps_submission_state() {
        let mut state = PanelState::default();
        state.begin();
        state.succeed("http://localhost:5000/video/a.mp4".into());

        state.reject(&TtvError::EmptyPrompt);
        assert_eq!(state.submission, SubmissionState::Succeeded);
        assert_eq!(
            state.error.as_deref(),
            Some("Please enter a prompt or select a lesson")
        );
        assert!(state.video_url.is_some());
    }
}
