/// Event types for the wizard
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use serde::{Deserialize, Serialize};

/// Identity and position snapshot of a wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoObject {
    pub dispatcher: String,
    /// Zero-based step index, `-1` before the wizard was first shown
    pub position: i64,
    pub position_name: String,
}

impl InfoObject {
    /// The position as a step index, `None` for the uninitialised sentinel
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.position).ok()
    }
}

/// Payload of the page-changed event: the new position plus where it came from.
///
/// Serializes flat, `{dispatcher, position, positionName, previous}`. On the
/// very first transition `previous` is `{position: -1, positionName: "step--1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChanged {
    #[serde(flatten)]
    pub current: InfoObject,
    pub previous: InfoObject,
}

/// Wizard events
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// A container was enhanced and registered
    Enhanced { dispatcher: String, length: usize },

    /// A transition completed
    PageChanged(PageChanged),

    /// An invalid target was replaced by the first step
    FallbackApplied { dispatcher: String, requested: String },
}

impl WizardEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            WizardEvent::Enhanced { dispatcher, length } => {
                format!("Wizard {} enhanced with {} steps", dispatcher, length)
            }
            WizardEvent::PageChanged(change) => match change.previous.index() {
                Some(_) => format!(
                    "Wizard {} moved from {} to {}",
                    change.current.dispatcher,
                    change.previous.position_name,
                    change.current.position_name
                ),
                None => format!(
                    "Wizard {} opened at {}",
                    change.current.dispatcher, change.current.position_name
                ),
            },
            WizardEvent::FallbackApplied {
                dispatcher,
                requested,
            } => {
                format!("Wizard {} fell back to the first step (requested {})", dispatcher, requested)
            }
        }
    }

    /// Identifier of the wizard the event belongs to
    pub fn dispatcher(&self) -> &str {
        match self {
            WizardEvent::Enhanced { dispatcher, .. } => dispatcher,
            WizardEvent::PageChanged(change) => &change.current.dispatcher,
            WizardEvent::FallbackApplied { dispatcher, .. } => dispatcher,
        }
    }
}
