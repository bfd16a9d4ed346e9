/// Browser history integration
///
/// Every transition writes one entry describing the wizard position, so the
/// back and forward buttons can move between steps. User-initiated moves push
/// a new entry; programmatic ones (initialisation, pops, fallbacks) replace the
/// current entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A navigation state entry owned by one wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub dispatcher: String,
    pub position: usize,
    pub position_name: String,
}

impl HistoryEntry {
    pub fn to_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Parse the leading integer of a string, ignoring leading whitespace and
/// anything after the digits.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Delivered on user-driven back/forward navigation.
///
/// The state is whatever was stored with the entry, possibly by other code on
/// the page. Positions are parsed leniently: `2`, `"2"` and `" 2abc"` all
/// mean 2.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopState {
    pub state: Option<Value>,
}

impl PopState {
    pub fn new(state: Value) -> Self {
        Self { state: Some(state) }
    }

    /// Wizard the popped entry belongs to
    pub fn dispatcher(&self) -> Option<&str> {
        self.state
            .as_ref()?
            .get("dispatcher")?
            .as_str()
            .filter(|d| !d.is_empty())
    }

    /// Raw popped position, which may well be out of range
    pub fn position(&self) -> Option<i64> {
        match self.state.as_ref()?.get("position")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => parse_leading_int(s),
            _ => None,
        }
    }
}

/// Push/replace access to the browser history
pub trait HistoryProvider {
    fn push(&mut self, entry: &HistoryEntry);

    fn replace(&mut self, entry: &HistoryEntry);
}

/// History stack kept in memory, with a cursor like the browser's
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<Value>,
    cursor: usize,
    pushes: usize,
    replaces: usize,
}

impl MemoryHistory {
    /// Start with a single blank entry, as a fresh page load does
    pub fn new() -> Self {
        Self {
            entries: vec![Value::Null],
            ..Self::default()
        }
    }

    /// Go back one entry, returning the pop notification if possible
    pub fn back(&mut self) -> Option<PopState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.pop_state())
    }

    /// Go forward one entry, returning the pop notification if possible
    pub fn forward(&mut self) -> Option<PopState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.pop_state())
    }

    pub fn current(&self) -> Option<&Value> {
        self.entries.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_count(&self) -> usize {
        self.pushes
    }

    pub fn replace_count(&self) -> usize {
        self.replaces
    }

    fn pop_state(&self) -> PopState {
        PopState {
            state: self.entries.get(self.cursor).filter(|v| !v.is_null()).cloned(),
        }
    }
}

impl HistoryProvider for MemoryHistory {
    fn push(&mut self, entry: &HistoryEntry) {
        // Pushing discards any forward entries
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry.to_state());
        self.cursor = self.entries.len() - 1;
        self.pushes += 1;
    }

    fn replace(&mut self, entry: &HistoryEntry) {
        if self.entries.is_empty() {
            self.entries.push(entry.to_state());
            self.cursor = 0;
        } else {
            self.entries[self.cursor] = entry.to_state();
        }
        self.replaces += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(position: usize) -> HistoryEntry {
        HistoryEntry {
            dispatcher: "signup".to_string(),
            position,
            position_name: format!("step-{}", position),
        }
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let value = entry(1).to_state();
        assert_eq!(
            value,
            json!({ "dispatcher": "signup", "position": 1, "positionName": "step-1" })
        );
    }

    #[test]
    fn test_pop_state_lenient_position() {
        let numeric = PopState::new(json!({ "dispatcher": "signup", "position": 2 }));
        let text = PopState::new(json!({ "dispatcher": "signup", "position": "2" }));
        let trailing = PopState::new(json!({ "dispatcher": "signup", "position": " 2px" }));

        assert_eq!(numeric.position(), Some(2));
        assert_eq!(text.position(), Some(2));
        assert_eq!(trailing.position(), Some(2));
    }

    #[test]
    fn test_pop_state_foreign_entries() {
        assert_eq!(PopState::new(json!({ "page": 3 })).dispatcher(), None);
        assert_eq!(PopState::new(json!({ "dispatcher": "", "position": 0 })).dispatcher(), None);
        assert_eq!(PopState::new(json!({ "dispatcher": 7 })).dispatcher(), None);
        assert_eq!(PopState::new(json!({ "dispatcher": "w", "position": "abc" })).position(), None);
        assert_eq!(PopState::new(json!({ "dispatcher": "w", "position": [1] })).position(), None);
        assert_eq!(PopState::new(Value::Null).dispatcher(), None);
    }

    #[test]
    fn test_pop_state_raw_fields() {
        let pop = PopState::new(json!({ "dispatcher": "signup", "position": -3 }));
        assert_eq!(pop.dispatcher(), Some("signup"));
        assert_eq!(pop.position(), Some(-3));

        let pop = PopState::new(json!({ "dispatcher": "signup" }));
        assert_eq!(pop.position(), None);

        assert_eq!(PopState::default().dispatcher(), None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("-1"), Some(-1));
        assert_eq!(parse_leading_int("  7 / 9"), Some(7));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("x1"), None);
    }

    #[test]
    fn test_push_then_back_and_forward() {
        let mut history = MemoryHistory::new();
        history.replace(&entry(0));
        history.push(&entry(1));
        history.push(&entry(2));

        assert_eq!(history.len(), 3);
        assert_eq!(history.push_count(), 2);
        assert_eq!(history.replace_count(), 1);

        let pop = history.back().unwrap();
        assert_eq!(pop.dispatcher(), Some("signup"));
        assert_eq!(pop.position(), Some(1));

        let pop = history.forward().unwrap();
        assert_eq!(pop.position(), Some(2));
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new();
        history.push(&entry(1));
        history.push(&entry(2));
        history.back();
        history.back();
        history.push(&entry(5));

        assert_eq!(history.len(), 2);
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_back_to_blank_entry_has_no_state() {
        let mut history = MemoryHistory::new();
        history.push(&entry(1));

        let pop = history.back().unwrap();
        assert!(pop.state.is_none());
        assert_eq!(pop.dispatcher(), None);
        assert!(history.back().is_none());
    }
}
