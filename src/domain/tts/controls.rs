//! User-facing controls of the studio.
//!
//! The orchestrator never looks controls up on its own: it receives a
//! [`ControlPanel`] listing the affordances this variant offers and a
//! [`ControlSurface`] that renders the effects it emits.

use super::session::Session;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Affordance {
    Generate,
    Preview,
    Clear,
    Download,
}

impl Affordance {
    pub const ALL: [Affordance; 4] = [
        Affordance::Generate,
        Affordance::Preview,
        Affordance::Clear,
        Affordance::Download,
    ];

    /// Controls disabled for the duration of a request
    pub fn locks_during_flight(&self) -> bool {
        matches!(
            self,
            Affordance::Generate | Affordance::Preview | Affordance::Clear
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    ControlsLocked,
    ControlsReleased,
    LoadingShown,
    LoadingHidden,
    AudioShown {
        kind: &'static str,
        url: Option<String>,
        downloadable: bool,
    },
    AudioHidden,
    ErrorShown(String),
    ErrorHidden,
    StatusShown(String),
    TextCleared,
}

/// Renders effects emitted by the orchestrator
pub trait ControlSurface: Send + Sync {
    fn apply(&self, effect: &UiEffect);
}

#[derive(Clone)]
pub struct ControlPanel {
    affordances: Vec<Affordance>,
    surface: Arc<dyn ControlSurface>,
}

impl ControlPanel {
    /// Panel offering every affordance
    pub fn new(surface: Arc<dyn ControlSurface>) -> Self {
        Self::with_affordances(Affordance::ALL.to_vec(), surface)
    }

    pub fn with_affordances(affordances: Vec<Affordance>, surface: Arc<dyn ControlSurface>) -> Self {
        Self {
            affordances,
            surface,
        }
    }

    pub fn recognizes(&self, affordance: Affordance) -> bool {
        self.affordances.contains(&affordance)
    }

    pub fn is_enabled(&self, affordance: Affordance, session: &Session) -> bool {
        if !self.recognizes(affordance) {
            return false;
        }
        if !session.state.accepts_triggers() && affordance.locks_during_flight() {
            return false;
        }
        match affordance {
            Affordance::Download => session.downloadable_audio().is_some(),
            _ => true,
        }
    }

    pub fn apply(&self, effect: UiEffect) {
        tracing::debug!(effect = ?effect, "Control panel effect");
        self.surface.apply(&effect);
    }
}

/// What the panel currently shows
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PanelView {
    pub controls_locked: bool,
    pub loading: bool,
    pub audio_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// In-memory surface backing the HTTP session view
#[derive(Default)]
pub struct PanelState {
    view: Mutex<PanelView>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelView {
        self.view.lock().clone()
    }
}

impl ControlSurface for PanelState {
    fn apply(&self, effect: &UiEffect) {
        let mut view = self.view.lock();
        match effect {
            UiEffect::ControlsLocked => view.controls_locked = true,
            UiEffect::ControlsReleased => view.controls_locked = false,
            UiEffect::LoadingShown => view.loading = true,
            UiEffect::LoadingHidden => view.loading = false,
            UiEffect::AudioShown { url, .. } => {
                view.audio_visible = true;
                view.audio_url = url.clone();
            }
            UiEffect::AudioHidden => {
                view.audio_visible = false;
                view.audio_url = None;
            }
            UiEffect::ErrorShown(message) => {
                view.error = Some(message.clone());
                view.audio_visible = false;
            }
            UiEffect::ErrorHidden => view.error = None,
            UiEffect::StatusShown(message) => view.status = Some(message.clone()),
            UiEffect::TextCleared => {
                view.audio_visible = false;
                view.audio_url = None;
                view.error = None;
                view.status = None;
            }
        }
    }
}
