//! The prompt-to-video panel.
//!
//! [`PromptVideoPanel`] owns a [`PanelState`] and drives it through
//! Idle -> InFlight -> Succeeded/Failed. At most one submission is outstanding
//! at a time: the submit trigger is backed by a single-permit semaphore, and a
//! second submit while one is in flight returns [`SubmitOutcome::Busy`]
//! without touching state or the network.

mod state;
mod view;

pub use state::{PanelState, SubmissionState};
pub use view::{PanelView, VideoElement, BUSY_LABEL, IDLE_LABEL};

use crate::error::{Result, TtvError};
use crate::lesson::{Lesson, PromptSource};
use crate::service::{GenerateVideoRequest, GeneratedArtifact, VideoService};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{Semaphore, SemaphorePermit};

/// How a submit call ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The service produced a video.
    Succeeded {
        /// Playback URL of the generated video.
        video_url: String,
    },
    /// The request was sent and failed.
    Failed(TtvError),
    /// Validation failed locally; nothing was sent.
    Rejected(TtvError),
    /// Another submission is in flight; nothing happened.
    Busy,
}

impl SubmitOutcome {
    /// Returns true if a playback URL was produced.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The playback URL, when the submission succeeded.
    pub fn video_url(&self) -> Option<&str> {
        match self {
            Self::Succeeded { video_url } => Some(video_url),
            _ => None,
        }
    }
}

/// A single-session panel bound to one generation service.
pub struct PromptVideoPanel<S> {
    service: S,
    state: Mutex<PanelState>,
    slot: Semaphore,
}

impl<S: VideoService> PromptVideoPanel<S> {
    /// Creates an idle panel with empty prompt text.
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(PanelState::default()),
            slot: Semaphore::new(1),
        }
    }

    /// The generation service this panel submits to.
    pub fn service(&self) -> &S {
        &self.service
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a render-ready copy of the current state.
    pub fn snapshot(&self) -> PanelView {
        PanelView::from(&*self.state())
    }

    /// True while a submission is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.state().is_in_flight()
    }

    /// Sets the free text verbatim.
    pub fn edit_prompt(&self, text: impl Into<String>) {
        self.state().edit_prompt(text);
    }

    /// The free text as a prompt source, captured now.
    ///
    /// Later edits do not change the returned source, so a caller can fix
    /// what gets sent before handing the submission off to another task.
    pub fn current_prompt(&self) -> PromptSource {
        PromptSource::FreeText(self.state().prompt.clone())
    }

    /// Looks up `key` in the catalog and submits that lesson right away.
    pub async fn select_lesson(&self, key: &str) -> SubmitOutcome {
        match key.parse::<Lesson>() {
            Ok(lesson) => self.submit(Some(lesson.into())).await,
            Err(_) if self.is_in_flight() => SubmitOutcome::Busy,
            Err(err) => {
                tracing::debug!(key, "rejected unknown lesson");
                self.state().reject(&err);
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// Submits `explicit` if given, otherwise the current free text.
    pub async fn submit(&self, explicit: Option<PromptSource>) -> SubmitOutcome {
        let Some(slot) = SubmissionSlot::try_acquire(self) else {
            tracing::debug!("submit ignored, a generation is already in flight");
            return SubmitOutcome::Busy;
        };

        let source = explicit.unwrap_or_else(|| self.current_prompt());
        let prompt = match source.validated() {
            Ok(prompt) => prompt.to_string(),
            Err(err) => {
                self.state().reject(&err);
                return SubmitOutcome::Rejected(err);
            }
        };

        slot.begin();
        tracing::debug!(prompt_len = prompt.len(), "submitting generation request");

        let request = GenerateVideoRequest::new(prompt);
        let result = self
            .service
            .generate_video(&request)
            .await
            .and_then(|artifact| self.derive_video_url(&artifact));

        slot.finish(result)
    }

    fn derive_video_url(&self, artifact: &GeneratedArtifact) -> Result<String> {
        let filename = artifact.filename();
        if filename.is_empty() {
            return Err(TtvError::MalformedResponse(format!(
                "video_path '{}' has no filename",
                artifact.video_path
            )));
        }
        Ok(self.service.playback_url(filename))
    }
}

/// The exclusive right to run one submission.
///
/// Dropping the slot while the panel is still InFlight (a panic in the
/// service, or the submit future being dropped) marks the submission Failed,
/// so the trigger is re-enabled on every exit path.
struct SubmissionSlot<'a> {
    state: &'a Mutex<PanelState>,
    _permit: SemaphorePermit<'a>,
}

impl<'a> SubmissionSlot<'a> {
    fn try_acquire<S>(panel: &'a PromptVideoPanel<S>) -> Option<Self> {
        let permit = panel.slot.try_acquire().ok()?;
        Some(Self {
            state: &panel.state,
            _permit: permit,
        })
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        self.lock().begin();
    }

    fn finish(self, result: Result<String>) -> SubmitOutcome {
        match result {
            Ok(video_url) => {
                tracing::debug!(video_url = %video_url, "video ready");
                self.lock().succeed(video_url.clone());
                SubmitOutcome::Succeeded { video_url }
            }
            Err(err) => {
                tracing::warn!(error = %err, "video generation failed");
                self.lock().fail();
                SubmitOutcome::Failed(err)
            }
        }
    }
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        let mut state = self.lock();
        if state.is_in_flight() {
            tracing::warn!("submission ended without a result");
            state.fail();
        }
    }
}
