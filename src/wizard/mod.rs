/// Multi-step wizard module
///
/// Turns a container of step elements into a navigable wizard with history,
/// scrolling and focus handling.
///
/// ## Architecture
///
/// ```text
/// WizardController
///   ├── WizardState (authoritative position per identifier)
///   ├── StepSnapshot / StepView (what the document says about each step)
///   ├── TransitionPlan (entering / exiting / idle role per step)
///   ├── PersistedAttributes (data-* mirror on the container)
///   └── Scheduler (animation cleanups and focus fixes)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use identity_wizard::wizard::WizardController;
///
/// let mut controller = WizardController::new(dom, history, scroller, config);
/// let id = controller.enhance(container)?;
///
/// controller.next(&id)?;
/// controller.set_position(&id, "pricing", true)?;
///
/// // Animation window elapsed
/// controller.advance(config.timings.animation());
/// ```
///
/// ## Positions
///
/// A position is either a zero-based index or a step name. Anything that
/// does not resolve to an existing step sends the wizard back to its first
/// step instead of failing.

pub mod steps;
pub mod state;
pub mod position;
pub mod transition;
pub mod persistence;
pub mod controller;

// Re-export commonly used types
pub use controller::WizardController;
pub use persistence::PersistedAttributes;
pub use position::{resolve, Direction, StepTarget};
pub use state::WizardState;
pub use steps::{StepSnapshot, StepView, TransitionState, Visibility};
pub use transition::{Deferred, StepRole, TaskKey, TransitionPlan};
