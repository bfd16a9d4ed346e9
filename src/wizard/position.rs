/// Position resolution and direction inference
///
/// Turns a requested target (an index, or a step name) into a validated
/// index, and tells which way a transition goes.

use std::fmt;

use super::steps::StepSnapshot;
use crate::error::{WizardError, WizardResult};

/// A requested position: numeric index or stable step name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTarget {
    Index(i64),
    Name(String),
}

impl From<i64> for StepTarget {
    fn from(index: i64) -> Self {
        StepTarget::Index(index)
    }
}

impl From<usize> for StepTarget {
    fn from(index: usize) -> Self {
        StepTarget::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<&str> for StepTarget {
    fn from(name: &str) -> Self {
        StepTarget::Name(name.to_string())
    }
}

impl From<String> for StepTarget {
    fn from(name: String) -> Self {
        StepTarget::Name(name)
    }
}

impl fmt::Display for StepTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepTarget::Index(index) => write!(f, "{}", index),
            StepTarget::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Resolve `target` against the steps currently in the document.
///
/// A name resolves to the ordinal of the first step carrying it among its
/// siblings. Either way the result must index an existing step.
///
/// Only step elements are searched: a name attribute on any other
/// descendant of the wizard has no index to resolve to.
pub fn resolve(target: &StepTarget, steps: &[StepSnapshot]) -> WizardResult<usize> {
    let invalid = || WizardError::InvalidPosition {
        requested: target.to_string(),
        length: steps.len(),
    };

    let position = match target {
        StepTarget::Index(index) => usize::try_from(*index).map_err(|_| invalid())?,
        StepTarget::Name(name) => steps
            .iter()
            .find(|step| step.name.as_deref() == Some(name.as_str()))
            .map(|step| step.ordinal)
            .ok_or_else(invalid)?,
    };

    if position >= steps.len() {
        return Err(invalid());
    }
    Ok(position)
}

/// Which way a transition goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// No previous position (first display)
    None,
    Forwards,
    Backwards,
}

impl Direction {
    pub fn infer(current: Option<usize>, target: usize) -> Self {
        match current {
            None => Direction::None,
            Some(current) if current > target => Direction::Backwards,
            Some(_) => Direction::Forwards,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::None => "none",
            Direction::Forwards => "forwards",
            Direction::Backwards => "backwards",
        };
        write!(f, "{}", s)
    }
}
