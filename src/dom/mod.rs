/// DOM adapter
///
/// The controller never touches a document directly. It goes through two
/// narrow traits, one for reads and one for writes, and every access happens
/// inside a frame:
///
/// ```text
/// Frame::begin(&mut doc)      read phase   -> &dyn DomRead
///     .into_writes()          write phase  -> &mut dyn DomWrite
/// ```
///
/// `into_writes` consumes the read phase, so a read can never be issued after
/// a write within the same frame.

pub mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::{MemoryDocument, Op, OpKind, WizardElements, WizardMarkup};

/// Opaque handle to an element owned by a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A custom event dispatched on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub name: String,
    pub bubbles: bool,
    pub detail: serde_json::Value,
}

/// Read access to a document
pub trait DomRead {
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Descendants of `root` carrying `class`, in document order
    fn elements_by_class(&self, root: ElementId, class: &str) -> Vec<ElementId>;

    /// `element` itself or its nearest ancestor carrying `class`
    fn closest(&self, element: ElementId, class: &str) -> Option<ElementId>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn children(&self, element: ElementId) -> Vec<ElementId>;

    /// Distance from the viewport top to the element's bounding box top
    fn bounding_top(&self, element: ElementId) -> f64;

    /// Current vertical scroll offset of the window
    fn scroll_y(&self) -> f64;
}

/// Write access to a document
pub trait DomWrite {
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn toggle_class(&mut self, element: ElementId, class: &str, force: bool) {
        if force {
            self.add_class(element, class);
        } else {
            self.remove_class(element, class);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str);

    fn focus(&mut self, element: ElementId);

    fn dispatch_event(&mut self, element: ElementId, event: CustomEvent);
}

/// A document the controller can drive
pub trait Document: DomRead + DomWrite {
    /// Called when a frame opens
    fn frame_started(&mut self) {}

    /// Called when a frame closes
    fn frame_finished(&mut self) {}
}

/// Read phase of a frame
pub struct Frame<'d, D: Document> {
    inner: WriteFrame<'d, D>,
}

impl<'d, D: Document> Frame<'d, D> {
    pub fn begin(dom: &'d mut D) -> Self {
        Self {
            inner: WriteFrame::begin(dom),
        }
    }

    pub fn read<T>(&self, f: impl FnOnce(&dyn DomRead) -> T) -> T {
        f(&*self.inner.dom)
    }

    /// End the read phase. No further reads are possible in this frame.
    pub fn into_writes(self) -> WriteFrame<'d, D> {
        self.inner
    }
}

/// Write phase of a frame; the frame closes when this is dropped
pub struct WriteFrame<'d, D: Document> {
    dom: &'d mut D,
}

impl<'d, D: Document> WriteFrame<'d, D> {
    /// Open a frame that only writes (deferred tasks)
    pub fn begin(dom: &'d mut D) -> Self {
        dom.frame_started();
        Self { dom }
    }

    pub fn write<T>(&mut self, f: impl FnOnce(&mut dyn DomWrite) -> T) -> T {
        f(&mut *self.dom)
    }
}

impl<D: Document> Drop for WriteFrame<'_, D> {
    fn drop(&mut self) {
        self.dom.frame_finished();
    }
}
