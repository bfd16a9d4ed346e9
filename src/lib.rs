//! Identity wizard
//!
//! Navigation state machine for multi-step forms embedded in a page. The
//! document, browser history and scrolling are reached through traits, so
//! the same controller drives a real page or the in-memory implementations
//! used by the demo binary and the tests.

pub mod config;
pub mod dom;
pub mod error;
pub mod history;
pub mod logging;
pub mod messaging;
pub mod scheduler;
pub mod scroll;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{AppResult, ConfigError, WizardError, WizardResult};
pub use messaging::{InfoObject, PageChanged, WizardEvent};
pub use wizard::{StepTarget, WizardController};
