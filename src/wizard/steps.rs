/// Wizard step model
///
/// Steps are elements in the document. The controller reads them into
/// [`StepSnapshot`]s at the start of a transition and projects visibility and
/// transition state back onto them through classes and attributes.

use crate::config::{ClassNames, WizardConfig};
use crate::dom::{DomRead, ElementId};

pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const HIDDEN: &str = "hidden";

/// Name used for steps that carry no explicit name. The uninitialised
/// position `-1` becomes `step--1`.
pub fn synthesized_name(index: impl std::fmt::Display) -> String {
    format!("step-{}", index)
}

/// A step as read at the start of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSnapshot {
    pub element: ElementId,

    /// Explicit stable name, if the markup carries one
    pub name: Option<String>,

    /// Position among the step's sibling elements
    pub ordinal: usize,
}

impl StepSnapshot {
    /// Read every step of the wizard rooted at `wizard`
    pub fn read_all(dom: &dyn DomRead, wizard: ElementId, config: &WizardConfig) -> Vec<Self> {
        dom.elements_by_class(wizard, &config.classes.step)
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                let name = dom
                    .attribute(element, &config.step_name_attribute)
                    .filter(|n| !n.is_empty());
                let ordinal = dom
                    .parent(element)
                    .and_then(|parent| dom.children(parent).iter().position(|c| *c == element))
                    .unwrap_or(index);
                Self {
                    element,
                    name,
                    ordinal,
                }
            })
            .collect()
    }
}

/// Name reported for position `index`: the step's own name, else `step-<index>`
pub fn position_name(steps: &[StepSnapshot], index: usize) -> String {
    steps
        .get(index)
        .and_then(|step| step.name.clone())
        .unwrap_or_else(|| synthesized_name(index))
}

/// Whether a step is shown at steady state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Animation phase of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Entering,
    EnteringReverse,
    Exiting,
    ExitingReverse,
}

impl TransitionState {
    /// Class marking this phase, if any
    pub fn class<'a>(&self, classes: &'a ClassNames) -> Option<&'a str> {
        match self {
            TransitionState::Idle => None,
            TransitionState::Entering => Some(&classes.step_in),
            TransitionState::EnteringReverse => Some(&classes.step_in_reverse),
            TransitionState::Exiting => Some(&classes.step_out),
            TransitionState::ExitingReverse => Some(&classes.step_out_reverse),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TransitionState::Idle)
    }
}

/// A step's visibility and accessibility state as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub visibility: Visibility,
    pub transition: TransitionState,
    pub aria_hidden: bool,
    pub hidden_attribute: bool,
}

impl StepView {
    pub fn observe(dom: &dyn DomRead, step: ElementId, classes: &ClassNames) -> Self {
        let transition = [
            TransitionState::Entering,
            TransitionState::EnteringReverse,
            TransitionState::Exiting,
            TransitionState::ExitingReverse,
        ]
        .into_iter()
        .find(|state| state.class(classes).is_some_and(|c| dom.has_class(step, c)))
        .unwrap_or_default();

        let visibility = if dom.has_class(step, &classes.step_hidden) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };

        Self {
            visibility,
            transition,
            aria_hidden: dom.attribute(step, ARIA_HIDDEN).as_deref() == Some("true"),
            hidden_attribute: dom.attribute(step, HIDDEN).is_some(),
        }
    }

    /// Shown and exposed to assistive technology
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Visible && !self.aria_hidden && !self.hidden_attribute
    }
}
