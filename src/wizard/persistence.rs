/// Persisted container attributes
///
/// The container mirrors the wizard position as string attributes, so markup
/// and stylesheets (and anything reading the page) can see it. The controller
/// writes them on every transition but never reads them back: its own
/// [`WizardState`] record is authoritative.

use super::state::WizardState;
use crate::dom::{DomRead, DomWrite, ElementId};
use crate::history::parse_leading_int;

pub const ATTR_POSITION: &str = "data-position";
pub const ATTR_LENGTH: &str = "data-length";
pub const ATTR_POSITION_NAME: &str = "data-position-name";

/// Position data as stored on the container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedAttributes {
    pub position: Option<usize>,
    pub length: usize,
    pub position_name: Option<String>,
}

impl PersistedAttributes {
    /// Create persistence data from wizard state
    pub fn from_state(state: &WizardState) -> Self {
        Self {
            position: state.position(),
            length: state.length(),
            position_name: state.position_name().map(str::to_string),
        }
    }

    /// Parse the attributes of `element`.
    ///
    /// Missing or negative positions read as uninitialised; numbers are parsed
    /// leniently (leading integer).
    pub fn read(dom: &dyn DomRead, element: ElementId) -> Self {
        let parse = |name: &str| {
            dom.attribute(element, name)
                .and_then(|v| parse_leading_int(&v))
                .and_then(|n| usize::try_from(n).ok())
        };

        Self {
            position: parse(ATTR_POSITION),
            length: parse(ATTR_LENGTH).unwrap_or(0),
            position_name: dom.attribute(element, ATTR_POSITION_NAME),
        }
    }

    pub fn write(&self, dom: &mut dyn DomWrite, element: ElementId) {
        dom.set_attribute(element, ATTR_LENGTH, &self.length.to_string());
        match self.position {
            Some(position) => dom.set_attribute(element, ATTR_POSITION, &position.to_string()),
            None => dom.remove_attribute(element, ATTR_POSITION),
        }
        match &self.position_name {
            Some(name) => dom.set_attribute(element, ATTR_POSITION_NAME, name),
            None => dom.remove_attribute(element, ATTR_POSITION_NAME),
        }
    }
}
