/// In-memory document
///
/// A small element tree that implements the DOM adapter traits. Used by the
/// demo binary and the tests; it records every access made inside a frame so
/// the read-before-write ordering can be checked after the fact.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{CustomEvent, Document, DomRead, DomWrite, ElementId};
use crate::config::WizardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Read,
    Write,
}

/// One recorded DOM access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub frame: u64,
    pub kind: OpKind,
    pub call: &'static str,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    top: f64,
}

#[derive(Debug)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    scroll_y: f64,
    focused: Option<ElementId>,
    dispatched: Vec<(ElementId, CustomEvent)>,
    frame: u64,
    in_frame: bool,
    ops: RefCell<Vec<Op>>,
}

impl MemoryDocument {
    /// Create a document holding only a `body` element
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                tag: "body".to_string(),
                ..Element::default()
            }],
            scroll_y: 0.0,
            focused: None,
            dispatched: Vec::new(),
            frame: 0,
            in_frame: false,
            ops: RefCell::new(Vec::new()),
        }
    }

    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    /// Append a new element under `parent`
    pub fn create_element(&mut self, tag: &str, parent: ElementId) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: tag.to_string(),
            parent: Some(parent),
            ..Element::default()
        });
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Move `element` to position `index` among its siblings
    pub fn reorder(&mut self, element: ElementId, index: usize) {
        let Some(parent) = self.get(element).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.retain(|c| *c != element);
            let index = index.min(p.children.len());
            p.children.insert(index, element);
        }
    }

    /// Detach `element` from the tree
    pub fn remove_element(&mut self, element: ElementId) {
        let Some(parent) = self.get(element).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.retain(|c| *c != element);
        }
        if let Some(e) = self.elements.get_mut(element.0) {
            e.parent = None;
        }
    }

    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.get(element).map(|e| e.tag.as_str())
    }

    pub fn text(&self, element: ElementId) -> &str {
        self.get(element).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.get(element).map(|e| e.classes.clone()).unwrap_or_default()
    }

    pub fn set_bounding_top(&mut self, element: ElementId, top: f64) {
        if let Some(e) = self.elements.get_mut(element.0) {
            e.top = top;
        }
    }

    pub fn set_scroll_y(&mut self, offset: f64) {
        self.scroll_y = offset;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn dispatched(&self) -> &[(ElementId, CustomEvent)] {
        &self.dispatched
    }

    /// Events that reach `listener`: dispatched on it, or bubbling up from a descendant
    pub fn events_reaching(&self, listener: ElementId, name: &str) -> Vec<&CustomEvent> {
        self.dispatched
            .iter()
            .filter(|(target, event)| {
                event.name == name
                    && (*target == listener || (event.bubbles && self.is_ancestor(listener, *target)))
            })
            .map(|(_, event)| event)
            .collect()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&mut self) {
        self.ops.borrow_mut().clear();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// True when no frame issued a read after one of its writes
    pub fn reads_precede_writes(&self) -> bool {
        let ops = self.ops.borrow();
        let mut writing: Option<u64> = None;
        for op in ops.iter() {
            match op.kind {
                OpKind::Write => writing = Some(op.frame),
                OpKind::Read if writing == Some(op.frame) => return false,
                OpKind::Read => {}
            }
        }
        true
    }

    fn get(&self, element: ElementId) -> Option<&Element> {
        self.elements.get(element.0)
    }

    fn is_ancestor(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = self.get(element).and_then(|e| e.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|e| e.parent);
        }
        false
    }

    fn record(&self, kind: OpKind, call: &'static str) {
        if self.in_frame {
            self.ops.borrow_mut().push(Op {
                frame: self.frame,
                kind,
                call,
            });
        }
    }

    fn collect_by_class(&self, root: ElementId, class: &str, out: &mut Vec<ElementId>) {
        let Some(element) = self.get(root) else {
            return;
        };
        for child in &element.children {
            if self.get(*child).is_some_and(|c| c.classes.iter().any(|k| k == class)) {
                out.push(*child);
            }
            self.collect_by_class(*child, class, out);
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DomRead for MemoryDocument {
    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.record(OpKind::Read, "attribute");
        self.get(element).and_then(|e| e.attributes.get(name).cloned())
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.record(OpKind::Read, "has_class");
        self.get(element)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn elements_by_class(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.record(OpKind::Read, "elements_by_class");
        let mut out = Vec::new();
        self.collect_by_class(root, class, &mut out);
        out
    }

    fn closest(&self, element: ElementId, class: &str) -> Option<ElementId> {
        self.record(OpKind::Read, "closest");
        let mut current = Some(element);
        while let Some(id) = current {
            let e = self.get(id)?;
            if e.classes.iter().any(|c| c == class) {
                return Some(id);
            }
            current = e.parent;
        }
        None
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.record(OpKind::Read, "parent");
        self.get(element).and_then(|e| e.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.record(OpKind::Read, "children");
        self.get(element).map(|e| e.children.clone()).unwrap_or_default()
    }

    fn bounding_top(&self, element: ElementId) -> f64 {
        self.record(OpKind::Read, "bounding_top");
        self.get(element).map(|e| e.top).unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.record(OpKind::Read, "scroll_y");
        self.scroll_y
    }
}

impl DomWrite for MemoryDocument {
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.record(OpKind::Write, "set_attribute");
        if let Some(e) = self.elements.get_mut(element.0) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        self.record(OpKind::Write, "remove_attribute");
        if let Some(e) = self.elements.get_mut(element.0) {
            e.attributes.remove(name);
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.record(OpKind::Write, "add_class");
        if let Some(e) = self.elements.get_mut(element.0) {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.record(OpKind::Write, "remove_class");
        if let Some(e) = self.elements.get_mut(element.0) {
            e.classes.retain(|c| c != class);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.record(OpKind::Write, "set_text");
        if let Some(e) = self.elements.get_mut(element.0) {
            e.text = text.to_string();
        }
    }

    fn focus(&mut self, element: ElementId) {
        self.record(OpKind::Write, "focus");
        if self.get(element).is_some() {
            self.focused = Some(element);
        }
    }

    fn dispatch_event(&mut self, element: ElementId, event: CustomEvent) {
        self.record(OpKind::Write, "dispatch_event");
        self.dispatched.push((element, event));
    }
}

impl Document for MemoryDocument {
    fn frame_started(&mut self) {
        self.frame += 1;
        self.in_frame = true;
    }

    fn frame_finished(&mut self) {
        self.in_frame = false;
    }
}

/// Builds the markup of one wizard inside a [`MemoryDocument`]
///
/// ```text
/// div.identity-wizard#id
///   div                      (step list)
///     div.identity-wizard__step[data-wizard-step-name]...
///   div                      (controls)
///     button.js-identity-wizard__prev
///     span.identity-wizard__controls-pager...
///     button.js-identity-wizard__next > span
/// ```
#[derive(Debug, Clone, Default)]
pub struct WizardMarkup {
    id: Option<String>,
    steps: Vec<Option<String>>,
    pagers: usize,
    top: f64,
}

/// Handles to the elements created by [`WizardMarkup::build`]
#[derive(Debug, Clone)]
pub struct WizardElements {
    pub container: ElementId,
    pub step_list: ElementId,
    pub steps: Vec<ElementId>,
    pub pagers: Vec<ElementId>,
    pub prev: ElementId,
    pub next: ElementId,
    /// Label nested inside the next button
    pub next_label: ElementId,
}

impl WizardMarkup {
    pub fn new() -> Self {
        Self {
            pagers: 1,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add `count` unnamed steps
    pub fn steps(mut self, count: usize) -> Self {
        self.steps.extend(std::iter::repeat(None).take(count));
        self
    }

    pub fn named_step(mut self, name: &str) -> Self {
        self.steps.push(Some(name.to_string()));
        self
    }

    pub fn pagers(mut self, count: usize) -> Self {
        self.pagers = count;
        self
    }

    pub fn top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    pub fn build(self, doc: &mut MemoryDocument, config: &WizardConfig) -> WizardElements {
        let classes = &config.classes;
        let body = doc.body();

        let container = doc.create_element("div", body);
        doc.add_class(container, &classes.container);
        if let Some(id) = &self.id {
            doc.set_attribute(container, "id", id);
        }
        doc.set_bounding_top(container, self.top);

        let step_list = doc.create_element("div", container);
        let steps = self
            .steps
            .iter()
            .map(|name| {
                let step = doc.create_element("div", step_list);
                doc.add_class(step, &classes.step);
                if let Some(name) = name {
                    doc.set_attribute(step, &config.step_name_attribute, name);
                }
                step
            })
            .collect();

        let controls = doc.create_element("div", container);
        let prev = doc.create_element("button", controls);
        doc.add_class(prev, &classes.prev_trigger);
        let pagers = (0..self.pagers)
            .map(|_| {
                let pager = doc.create_element("span", controls);
                doc.add_class(pager, &classes.pager);
                pager
            })
            .collect();
        let next = doc.create_element("button", controls);
        doc.add_class(next, &classes.next_trigger);
        let next_label = doc.create_element("span", next);

        WizardElements {
            container,
            step_list,
            steps,
            pagers,
            prev,
            next,
            next_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (MemoryDocument, WizardElements, WizardConfig) {
        let config = WizardConfig::default();
        let mut doc = MemoryDocument::new();
        let wizard = WizardMarkup::new()
            .id("signup")
            .steps(2)
            .named_step("pricing")
            .build(&mut doc, &config);
        (doc, wizard, config)
    }

    #[test]
    fn test_markup_structure() {
        let (doc, wizard, config) = fixture();

        assert_eq!(wizard.steps.len(), 3);
        assert_eq!(wizard.pagers.len(), 1);
        assert_eq!(doc.attribute(wizard.container, "id").as_deref(), Some("signup"));
        assert_eq!(
            doc.elements_by_class(wizard.container, &config.classes.step),
            wizard.steps
        );
        assert_eq!(
            doc.attribute(wizard.steps[2], &config.step_name_attribute).as_deref(),
            Some("pricing")
        );
        assert_eq!(doc.tag(wizard.next), Some("button"));
    }

    #[test]
    fn test_closest_walks_ancestors() {
        let (doc, wizard, config) = fixture();

        assert_eq!(
            doc.closest(wizard.next_label, &config.classes.next_trigger),
            Some(wizard.next)
        );
        assert_eq!(
            doc.closest(wizard.next_label, &config.classes.container),
            Some(wizard.container)
        );
        assert_eq!(doc.closest(wizard.steps[0], &config.classes.next_trigger), None);
    }

    #[test]
    fn test_reorder_moves_sibling() {
        let (mut doc, wizard, _) = fixture();

        doc.reorder(wizard.steps[2], 0);
        assert_eq!(doc.children(wizard.step_list)[0], wizard.steps[2]);
    }

    #[test]
    fn test_bubbling_events_reach_ancestors() {
        let (mut doc, wizard, _) = fixture();

        doc.dispatch_event(
            wizard.container,
            CustomEvent {
                name: "wizardPageChanged".to_string(),
                bubbles: true,
                detail: serde_json::Value::Null,
            },
        );
        doc.dispatch_event(
            wizard.container,
            CustomEvent {
                name: "local".to_string(),
                bubbles: false,
                detail: serde_json::Value::Null,
            },
        );

        let body = doc.body();
        assert_eq!(doc.events_reaching(body, "wizardPageChanged").len(), 1);
        assert!(doc.events_reaching(body, "local").is_empty());
        assert_eq!(doc.events_reaching(wizard.container, "local").len(), 1);
    }

    #[test]
    fn test_interleaved_read_detected() {
        let (mut doc, wizard, _) = fixture();

        doc.frame_started();
        doc.add_class(wizard.container, "x");
        let _ = doc.has_class(wizard.container, "x");
        doc.frame_finished();

        assert!(!doc.reads_precede_writes());
    }
}
