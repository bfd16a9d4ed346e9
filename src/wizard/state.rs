/// Wizard state management
///
/// The authoritative position of one wizard instance. The controller keeps
/// one record per identifier and updates it synchronously, before any side
/// effect of a transition runs.

use super::steps::synthesized_name;
use crate::dom::ElementId;
use crate::messaging::InfoObject;

/// Wizard state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    /// Stable identifier (container `id`, else the configured default)
    identifier: String,

    /// Container element
    element: ElementId,

    /// Current step, `None` until the first transition
    position: Option<usize>,

    /// Number of steps seen by the last transition
    length: usize,

    /// Name of the current step
    position_name: Option<String>,

    /// Completed transitions
    transitions: u64,
}

impl WizardState {
    /// Create an uninitialised wizard state
    pub fn new(identifier: impl Into<String>, element: ElementId) -> Self {
        Self {
            identifier: identifier.into(),
            element,
            position: None,
            length: 0,
            position_name: None,
            transitions: 0,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Get current position
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Current position with `-1` standing for "not yet initialised"
    pub fn raw_position(&self) -> i64 {
        self.position
            .and_then(|p| i64::try_from(p).ok())
            .unwrap_or(-1)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn position_name(&self) -> Option<&str> {
        self.position_name.as_deref()
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// On the last step
    pub fn is_completed(&self) -> bool {
        self.position
            .is_some_and(|p| p + 1 >= self.length)
    }

    /// Still on the first step (or not started)
    pub fn is_introduction(&self) -> bool {
        self.position.map_or(true, |p| p < 1)
    }

    /// Record a new position
    pub fn set_position(&mut self, position: usize, length: usize, position_name: String) {
        self.position = Some(position);
        self.length = length;
        self.position_name = Some(position_name);
        self.transitions += 1;
    }

    /// Snapshot of the current position. Before the first transition this is
    /// the sentinel `{position: -1, positionName: "step--1"}`.
    pub fn info(&self) -> InfoObject {
        let position = self.raw_position();
        InfoObject {
            dispatcher: self.identifier.clone(),
            position,
            position_name: self
                .position_name
                .clone()
                .unwrap_or_else(|| synthesized_name(position)),
        }
    }

    /// Counter text shown in the pager, e.g. `2 / 3`
    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.raw_position() + 1, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wizard_state() {
        let state = WizardState::new("signup", ElementId(1));
        assert_eq!(state.identifier(), "signup");
        assert_eq!(state.position(), None);
        assert_eq!(state.raw_position(), -1);
        assert!(state.is_introduction());
        assert!(!state.is_completed());

        let info = state.info();
        assert_eq!(info.dispatcher, "signup");
        assert_eq!(info.position, -1);
        assert_eq!(info.position_name, "step--1");
        assert_eq!(info.index(), None);
    }

    #[test]
    fn test_set_position() {
        let mut state = WizardState::new("signup", ElementId(1));
        state.set_position(1, 3, "details".to_string());

        assert_eq!(state.position(), Some(1));
        assert_eq!(state.length(), 3);
        assert_eq!(state.position_name(), Some("details"));
        assert_eq!(state.transitions(), 1);
        assert_eq!(state.counter_text(), "2 / 3");
        assert!(!state.is_introduction());
        assert!(!state.is_completed());
    }

    #[test]
    fn test_completed_on_last_step() {
        let mut state = WizardState::new("signup", ElementId(1));
        state.set_position(2, 3, "step-2".to_string());
        assert!(state.is_completed());

        state.set_position(0, 1, "step-0".to_string());
        assert!(state.is_completed());
        assert!(state.is_introduction());
    }

    #[test]
    fn test_info() {
        let mut state = WizardState::new("signup", ElementId(1));
        state.set_position(0, 3, "step-0".to_string());

        let info = state.info();
        assert_eq!(info.dispatcher, "signup");
        assert_eq!(info.position, 0);
        assert_eq!(info.position_name, "step-0");
    }
}
