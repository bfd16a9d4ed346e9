/// Step transition orchestration
///
/// A transition touches every step of the wizard:
///
/// ```text
/// target step    Entering(direction)  shown now, `in` class cleared after the animation
/// current step   Exiting(direction)   hidden class now, `hidden` attribute after the animation
/// all others     Idle                 forced hidden, transition classes stripped
/// ```
///
/// Resetting the untouched steps on every call keeps the document consistent
/// even when transitions overlap.

use super::position::Direction;
use super::steps::{StepSnapshot, TransitionState, ARIA_HIDDEN, HIDDEN};
use crate::config::ClassNames;
use crate::dom::{DomWrite, ElementId};

/// What a transition does to one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    Entering(Direction),
    Exiting(Direction),
    Idle,
}

impl StepRole {
    pub fn transition_state(&self) -> TransitionState {
        match self {
            StepRole::Entering(Direction::None) => TransitionState::Idle,
            StepRole::Entering(Direction::Forwards) => TransitionState::Entering,
            StepRole::Entering(Direction::Backwards) => TransitionState::EnteringReverse,
            StepRole::Exiting(Direction::Forwards) => TransitionState::Exiting,
            StepRole::Exiting(_) => TransitionState::ExitingReverse,
            StepRole::Idle => TransitionState::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub index: usize,
    pub role: StepRole,
}

/// Per-step roles for one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub current: Option<usize>,
    pub target: usize,
    pub direction: Direction,
    pub changes: Vec<StepChange>,
}

impl TransitionPlan {
    pub fn new(step_count: usize, current: Option<usize>, target: usize) -> Self {
        let direction = Direction::infer(current, target);
        let changes = (0..step_count)
            .map(|index| {
                let role = if index == target {
                    StepRole::Entering(direction)
                } else if current == Some(index) {
                    StepRole::Exiting(direction)
                } else {
                    StepRole::Idle
                };
                StepChange { index, role }
            })
            .collect();

        Self {
            current,
            target,
            direction,
            changes,
        }
    }

    pub fn entering(&self) -> Option<usize> {
        self.find(|role| matches!(role, StepRole::Entering(_)))
    }

    pub fn exiting(&self) -> Option<usize> {
        self.find(|role| matches!(role, StepRole::Exiting(_)))
    }

    fn find(&self, predicate: impl Fn(&StepRole) -> bool) -> Option<usize> {
        self.changes
            .iter()
            .find(|change| predicate(&change.role))
            .map(|change| change.index)
    }
}

/// Scheduler key for deferred step work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Transition cleanup of one step
    Transition(ElementId),

    /// Focus fix of one wizard container
    Focus(ElementId),
}

/// Work deferred until after the animation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    FinishEntering(ElementId),
    FinishExiting(ElementId),
    Focus(ElementId),
}

impl Deferred {
    pub fn key(&self, container: ElementId) -> TaskKey {
        match self {
            Deferred::FinishEntering(step) | Deferred::FinishExiting(step) => {
                TaskKey::Transition(*step)
            }
            Deferred::Focus(_) => TaskKey::Focus(container),
        }
    }

    pub fn run(&self, dom: &mut dyn DomWrite, classes: &ClassNames) {
        match *self {
            Deferred::FinishEntering(step) => strip_transitions(dom, step, classes),
            Deferred::FinishExiting(step) => {
                strip_transitions(dom, step, classes);
                dom.set_attribute(step, HIDDEN, HIDDEN);
            }
            Deferred::Focus(step) => {
                dom.set_attribute(step, "tabindex", "-1");
                dom.focus(step);
            }
        }
    }
}

/// Project `plan` onto the steps. Returns the cleanups to run once the
/// animation window has passed.
pub fn apply(
    plan: &TransitionPlan,
    steps: &[StepSnapshot],
    dom: &mut dyn DomWrite,
    classes: &ClassNames,
) -> Vec<Deferred> {
    let mut deferred = Vec::new();

    for change in &plan.changes {
        let Some(step) = steps.get(change.index).map(|s| s.element) else {
            continue;
        };
        let state = change.role.transition_state();

        match change.role {
            StepRole::Entering(_) => {
                dom.set_attribute(step, ARIA_HIDDEN, "false");
                dom.remove_attribute(step, HIDDEN);
                dom.remove_class(step, &classes.step_hidden);
                strip_transitions(dom, step, classes);
                if let Some(class) = state.class(classes) {
                    dom.add_class(step, class);
                }
                deferred.push(Deferred::FinishEntering(step));
            }
            StepRole::Exiting(_) => {
                // Stays rendered for the exit animation; `hidden` follows later
                dom.set_attribute(step, ARIA_HIDDEN, "true");
                dom.remove_attribute(step, HIDDEN);
                strip_transitions(dom, step, classes);
                dom.add_class(step, &classes.step_hidden);
                if let Some(class) = state.class(classes) {
                    dom.add_class(step, class);
                }
                deferred.push(Deferred::FinishExiting(step));
            }
            StepRole::Idle => {
                dom.set_attribute(step, ARIA_HIDDEN, "true");
                dom.set_attribute(step, HIDDEN, HIDDEN);
                dom.add_class(step, &classes.step_hidden);
                strip_transitions(dom, step, classes);
            }
        }
    }

    deferred
}

fn strip_transitions(dom: &mut dyn DomWrite, step: ElementId, classes: &ClassNames) {
    for class in classes.transitions() {
        dom.remove_class(step, class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::dom::{DomRead, MemoryDocument, WizardMarkup};
    use crate::wizard::steps::{StepView, Visibility};

    fn roles(plan: &TransitionPlan) -> Vec<StepRole> {
        plan.changes.iter().map(|c| c.role).collect()
    }

    #[test]
    fn test_plan_first_display() {
        let plan = TransitionPlan::new(3, None, 0);
        assert_eq!(plan.direction, Direction::None);
        assert_eq!(
            roles(&plan),
            vec![StepRole::Entering(Direction::None), StepRole::Idle, StepRole::Idle]
        );
        assert_eq!(plan.exiting(), None);
    }

    #[test]
    fn test_plan_forwards_and_backwards() {
        let plan = TransitionPlan::new(4, Some(1), 2);
        assert_eq!(plan.entering(), Some(2));
        assert_eq!(plan.exiting(), Some(1));
        assert_eq!(plan.changes[1].role.transition_state(), TransitionState::Exiting);
        assert_eq!(plan.changes[2].role.transition_state(), TransitionState::Entering);

        let plan = TransitionPlan::new(4, Some(3), 0);
        assert_eq!(plan.changes[3].role.transition_state(), TransitionState::ExitingReverse);
        assert_eq!(plan.changes[0].role.transition_state(), TransitionState::EnteringReverse);
    }

    #[test]
    fn test_plan_same_position_has_no_exiting_step() {
        let plan = TransitionPlan::new(3, Some(1), 1);
        assert_eq!(plan.entering(), Some(1));
        assert_eq!(plan.exiting(), None);
    }

    #[test]
    fn test_plan_stale_current_outside_range() {
        let plan = TransitionPlan::new(2, Some(5), 1);
        assert_eq!(plan.exiting(), None);
        assert_eq!(plan.direction, Direction::Backwards);
    }

    #[test]
    fn test_apply_and_cleanup() {
        let config = WizardConfig::default();
        let classes = &config.classes;
        let mut doc = MemoryDocument::new();
        let wizard = WizardMarkup::new().steps(3).build(&mut doc, &config);
        let steps = StepSnapshot::read_all(&doc, wizard.container, &config);

        let plan = TransitionPlan::new(3, Some(0), 1);
        let deferred = apply(&plan, &steps, &mut doc, classes);
        assert_eq!(
            deferred,
            vec![
                Deferred::FinishExiting(wizard.steps[0]),
                Deferred::FinishEntering(wizard.steps[1]),
            ]
        );

        let entering = StepView::observe(&doc, wizard.steps[1], classes);
        assert_eq!(entering.transition, TransitionState::Entering);
        assert!(entering.is_accessible());

        let exiting = StepView::observe(&doc, wizard.steps[0], classes);
        assert_eq!(exiting.transition, TransitionState::Exiting);
        assert_eq!(exiting.visibility, Visibility::Hidden);
        assert!(exiting.aria_hidden);
        assert!(!exiting.hidden_attribute);

        let idle = StepView::observe(&doc, wizard.steps[2], classes);
        assert!(idle.transition.is_idle());
        assert!(idle.hidden_attribute);

        for task in &deferred {
            task.run(&mut doc, classes);
        }

        let entering = StepView::observe(&doc, wizard.steps[1], classes);
        assert!(entering.transition.is_idle());
        assert!(entering.is_accessible());

        let exiting = StepView::observe(&doc, wizard.steps[0], classes);
        assert!(exiting.transition.is_idle());
        assert!(exiting.hidden_attribute);
    }

    #[test]
    fn test_idle_reset_strips_residual_classes() {
        let config = WizardConfig::default();
        let classes = &config.classes;
        let mut doc = MemoryDocument::new();
        let wizard = WizardMarkup::new().steps(3).build(&mut doc, &config);
        let steps = StepSnapshot::read_all(&doc, wizard.container, &config);

        // Leftovers from an interrupted transition
        doc.add_class(wizard.steps[2], &classes.step_in);
        doc.add_class(wizard.steps[2], &classes.step_out_reverse);

        apply(&TransitionPlan::new(3, Some(0), 1), &steps, &mut doc, classes);

        let view = StepView::observe(&doc, wizard.steps[2], classes);
        assert!(view.transition.is_idle());
        assert_eq!(view.visibility, Visibility::Hidden);
    }

    #[test]
    fn test_focus_task() {
        let config = WizardConfig::default();
        let mut doc = MemoryDocument::new();
        let wizard = WizardMarkup::new().steps(2).build(&mut doc, &config);

        let task = Deferred::Focus(wizard.steps[1]);
        assert_eq!(task.key(wizard.container), TaskKey::Focus(wizard.container));
        task.run(&mut doc, &config.classes);

        assert_eq!(doc.focused(), Some(wizard.steps[1]));
        assert_eq!(doc.attribute(wizard.steps[1], "tabindex").as_deref(), Some("-1"));
    }
}
