/// Wizard controller
///
/// Drives every enhanced wizard on a page. One transition runs as:
///
/// ```text
/// read phase   bounding top, scroll offset, steps, pagers
/// resolve      target -> index (InvalidPosition fails fast)
/// scroll       best effort, only once the wizard was already showing
/// state        position/length/name recorded before any side effect
/// write phase  history, counter, container attributes, step transition
/// notify       wizardPageChanged on the container + WizardEvent on the bus
/// ```
///
/// An `InvalidPosition` anywhere in that sequence is answered by one
/// fallback transition to the first step.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::persistence::PersistedAttributes;
use super::position::{resolve, StepTarget};
use super::state::WizardState;
use super::steps::{position_name, synthesized_name, StepSnapshot};
use super::transition::{self, Deferred, TaskKey, TransitionPlan};
use crate::config::WizardConfig;
use crate::dom::{CustomEvent, Document, DomRead, ElementId, Frame, WriteFrame};
use crate::error::{WizardError, WizardResult};
use crate::history::{HistoryEntry, HistoryProvider, PopState};
use crate::messaging::{Command, CommandQueue, EventBus, InfoObject, PageChanged, WizardEvent};
use crate::scheduler::Scheduler;
use crate::scroll::{scroll_target, Easing, Scroller};

/// Everything a transition needs from the document, read up front
#[derive(Debug, Clone)]
struct ReadSnapshot {
    bounding_top: f64,
    scroll_y: f64,
    steps: Vec<StepSnapshot>,
    pagers: Vec<ElementId>,
}

impl ReadSnapshot {
    fn read(dom: &dyn DomRead, wizard: ElementId, config: &WizardConfig) -> Self {
        Self {
            bounding_top: dom.bounding_top(wizard),
            scroll_y: dom.scroll_y(),
            steps: StepSnapshot::read_all(dom, wizard, config),
            pagers: dom.elements_by_class(wizard, &config.classes.pager),
        }
    }
}

pub struct WizardController<D: Document, H: HistoryProvider, S: Scroller> {
    dom: D,
    history: H,
    scroller: S,
    config: WizardConfig,
    wizards: HashMap<String, WizardState>,
    scheduler: Scheduler<TaskKey, (ElementId, Deferred)>,
    events: EventBus,
    commands: CommandQueue,
}

impl<D: Document, H: HistoryProvider, S: Scroller> WizardController<D, H, S> {
    pub fn new(dom: D, history: H, scroller: S, config: WizardConfig) -> Self {
        Self {
            dom,
            history,
            scroller,
            config,
            wizards: HashMap::new(),
            scheduler: Scheduler::new(),
            events: EventBus::new(),
            commands: CommandQueue::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn scroller(&self) -> &S {
        &self.scroller
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    pub fn state(&self, identifier: &str) -> Option<&WizardState> {
        self.wizards.get(identifier)
    }

    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.wizards.get(identifier).and_then(WizardState::position)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.wizards.keys().map(String::as_str)
    }

    /// Deferred tasks still waiting for the clock
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Attach to a wizard container and show its first step.
    ///
    /// Returns the wizard's identifier, used to address it afterwards.
    pub fn enhance(&mut self, element: ElementId) -> WizardResult<String> {
        let identifier = {
            let frame = Frame::begin(&mut self.dom);
            frame.read(|dom| dom.attribute(element, "id"))
        }
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| self.config.default_identifier.clone());

        if self.wizards.contains_key(&identifier) {
            warn!(wizard = %identifier, "Wizard enhanced twice, replacing its state");
        }
        self.wizards
            .insert(identifier.clone(), WizardState::new(identifier.clone(), element));

        if let Err(e) = self.set_position(&identifier, 0usize, false) {
            self.wizards.remove(&identifier);
            return Err(e);
        }

        let length = self.wizards.get(&identifier).map_or(0, WizardState::length);
        info!(wizard = %identifier, length, "Wizard enhanced");
        self.events.publish(WizardEvent::Enhanced {
            dispatcher: identifier.clone(),
            length,
        });

        Ok(identifier)
    }

    /// Move a wizard to `target`.
    ///
    /// An invalid target falls back to the first step (non-user-initiated).
    /// If that fails as well the wizard has nothing to show and
    /// [`WizardError::NoSteps`] is returned.
    pub fn set_position(
        &mut self,
        identifier: &str,
        target: impl Into<StepTarget>,
        user_initiated: bool,
    ) -> WizardResult<PageChanged> {
        let target = target.into();
        match self.transition(identifier, &target, user_initiated) {
            Err(e) if e.is_invalid_position() => self.fall_back(identifier, target.to_string()),
            result => result,
        }
    }

    /// Snapshot of a wizard's identity and position.
    ///
    /// `position` defaults to the current one (`-1` before the first
    /// transition). Its name is read from the document, falling back to
    /// `step-<position>`.
    pub fn info_object(
        &mut self,
        identifier: &str,
        position: Option<i64>,
    ) -> WizardResult<InfoObject> {
        let state = self
            .wizards
            .get(identifier)
            .ok_or_else(|| WizardError::UnknownWizard(identifier.to_string()))?;
        let position = position.unwrap_or_else(|| state.raw_position());
        let element = state.element();

        let frame = Frame::begin(&mut self.dom);
        let steps = frame.read(|dom| StepSnapshot::read_all(dom, element, &self.config));

        let position_name = match usize::try_from(position) {
            Ok(index) => position_name(&steps, index),
            Err(_) => synthesized_name(position),
        };
        Ok(InfoObject {
            dispatcher: identifier.to_string(),
            position,
            position_name,
        })
    }

    pub fn next(&mut self, identifier: &str) -> WizardResult<PageChanged> {
        self.step_by(identifier, 1)
    }

    pub fn previous(&mut self, identifier: &str) -> WizardResult<PageChanged> {
        self.step_by(identifier, -1)
    }

    /// Handle a history pop.
    ///
    /// Returns true when the popped entry belongs to one of our wizards, in
    /// which case default navigation should be suppressed.
    pub fn handle_pop(&mut self, pop: &PopState) -> WizardResult<bool> {
        let Some(dispatcher) = pop.dispatcher() else {
            return Ok(false);
        };
        if !self.wizards.contains_key(dispatcher) {
            trace!(dispatcher, "Ignoring pop for another dispatcher");
            return Ok(false);
        }
        let dispatcher = dispatcher.to_string();

        match pop.position() {
            Some(position) => self.set_position(&dispatcher, position, false)?,
            None => self.fall_back(&dispatcher, "unreadable history position".to_string())?,
        };
        Ok(true)
    }

    /// Handle a click inside a wizard.
    ///
    /// Clicks on (or inside) a next/previous trigger move the wizard one step.
    pub fn handle_click(
        &mut self,
        identifier: &str,
        target: ElementId,
    ) -> WizardResult<Option<PageChanged>> {
        let element = self
            .wizards
            .get(identifier)
            .map(WizardState::element)
            .ok_or_else(|| WizardError::UnknownWizard(identifier.to_string()))?;

        let (next, prev) = {
            let frame = Frame::begin(&mut self.dom);
            let classes = &self.config.classes;
            frame.read(|dom| {
                let inside = |trigger: Option<ElementId>| {
                    trigger.filter(|t| is_within(dom, *t, element)).is_some()
                };
                (
                    inside(dom.closest(target, &classes.next_trigger)),
                    inside(dom.closest(target, &classes.prev_trigger)),
                )
            })
        };

        let mut change = None;
        if next {
            change = Some(self.next(identifier)?);
        }
        if prev {
            change = Some(self.previous(identifier)?);
        }
        Ok(change)
    }

    /// Run every queued command, one at a time, in submission order.
    /// Stops at the first error; later commands stay queued.
    pub fn process_commands(&mut self) -> WizardResult<Vec<PageChanged>> {
        let mut changes = Vec::new();
        while let Some(command) = self.commands.next() {
            debug!("Executing command: {}", command.description());
            match command {
                Command::Next { wizard } => changes.push(self.next(&wizard)?),
                Command::Previous { wizard } => changes.push(self.previous(&wizard)?),
                Command::GoTo {
                    wizard,
                    target,
                    user_initiated,
                } => changes.push(self.set_position(&wizard, target, user_initiated)?),
                Command::Click { wizard, target } => {
                    changes.extend(self.handle_click(&wizard, target)?);
                }
                Command::Pop(pop) => {
                    self.handle_pop(&pop)?;
                }
            }
        }
        Ok(changes)
    }

    /// Advance the clock, running deferred cleanups and focus fixes that fall due
    pub fn advance(&mut self, by: Duration) {
        let due = self.scheduler.advance(by);
        self.run_deferred(due);
    }

    /// Run every pending deferred task
    pub fn run_until_idle(&mut self) {
        let due = self.scheduler.drain();
        self.run_deferred(due);
    }

    fn run_deferred(&mut self, due: Vec<(ElementId, Deferred)>) {
        if due.is_empty() {
            return;
        }
        let classes = &self.config.classes;
        let mut writes = WriteFrame::begin(&mut self.dom);
        for (container, task) in due {
            trace!(container = %container, ?task, "Running deferred task");
            writes.write(|dom| task.run(dom, classes));
        }
    }

    fn step_by(&mut self, identifier: &str, delta: i64) -> WizardResult<PageChanged> {
        let current = self
            .wizards
            .get(identifier)
            .map(WizardState::raw_position)
            .ok_or_else(|| WizardError::UnknownWizard(identifier.to_string()))?;
        self.set_position(identifier, current + delta, true)
    }

    fn fall_back(&mut self, identifier: &str, requested: String) -> WizardResult<PageChanged> {
        warn!(wizard = %identifier, %requested, "Invalid wizard position, falling back to the first step");
        self.events.publish(WizardEvent::FallbackApplied {
            dispatcher: identifier.to_string(),
            requested,
        });

        self.transition(identifier, &StepTarget::Index(0), false)
            .map_err(|e| {
                if e.is_invalid_position() {
                    WizardError::NoSteps {
                        dispatcher: identifier.to_string(),
                    }
                } else {
                    e
                }
            })
    }

    fn transition(
        &mut self,
        identifier: &str,
        target: &StepTarget,
        user_initiated: bool,
    ) -> WizardResult<PageChanged> {
        let state = self
            .wizards
            .get_mut(identifier)
            .ok_or_else(|| WizardError::UnknownWizard(identifier.to_string()))?;
        let element = state.element();
        let current = state.position();
        let config = &self.config;

        let frame = Frame::begin(&mut self.dom);
        let snapshot = frame.read(|dom| ReadSnapshot::read(dom, element, config));

        let position = resolve(target, &snapshot.steps)?;
        let length = snapshot.steps.len();

        let offset = scroll_target(snapshot.bounding_top, &config.scroll);
        if current.is_some() && snapshot.scroll_y > offset {
            self.scroller
                .scroll_to(offset, config.timings.scroll(), Easing::Linear);
        }

        // Named after the document as it is now, like the new position
        let mut previous = state.info();
        if let Some(p) = current {
            previous.position_name = position_name(&snapshot.steps, p);
        }
        state.set_position(position, length, position_name(&snapshot.steps, position));
        let persisted = PersistedAttributes::from_state(state);
        let counter = state.counter_text();
        let (completed, introduction) = (state.is_completed(), state.is_introduction());
        let current_info = state.info();

        // Superseded cleanups and focus fixes of this wizard must not fire
        // against the new state
        let steps: Vec<ElementId> = snapshot.steps.iter().map(|s| s.element).collect();
        self.scheduler.cancel_where(|key| match key {
            TaskKey::Transition(step) => steps.contains(step),
            TaskKey::Focus(container) => *container == element,
        });

        let entry = HistoryEntry {
            dispatcher: identifier.to_string(),
            position,
            position_name: current_info.position_name.clone(),
        };
        if user_initiated {
            self.history.push(&entry);
        } else {
            self.history.replace(&entry);
        }

        let plan = TransitionPlan::new(length, current, position);
        let classes = &config.classes;
        let mut writes = frame.into_writes();
        let deferred = writes.write(|dom| {
            persisted.write(dom, element);

            dom.toggle_class(element, &classes.completed, completed);
            dom.toggle_class(element, &classes.introduction, introduction);
            for pager in &snapshot.pagers {
                dom.set_text(*pager, &counter);
            }

            transition::apply(&plan, &snapshot.steps, dom, classes)
        });

        for task in deferred {
            self.scheduler
                .schedule(task.key(element), config.timings.animation(), (element, task));
        }
        if user_initiated {
            let focus = Deferred::Focus(snapshot.steps[position].element);
            self.scheduler
                .schedule(focus.key(element), config.timings.focus_delay(), (element, focus));
        }

        let change = PageChanged {
            current: current_info,
            previous,
        };
        let event = CustomEvent {
            name: config.event_name.clone(),
            bubbles: true,
            detail: event_detail(&change),
        };
        writes.write(|dom| dom.dispatch_event(element, event));
        drop(writes);

        debug!(
            wizard = %identifier,
            from = ?current,
            to = position,
            direction = %plan.direction,
            user_initiated,
            "Wizard transition"
        );
        self.events.publish(WizardEvent::PageChanged(change.clone()));

        Ok(change)
    }
}

/// JSON detail of the page-changed event
fn event_detail(change: &PageChanged) -> serde_json::Value {
    serde_json::to_value(change).unwrap_or_else(|e| {
        warn!(wizard = %change.current.dispatcher, "Failed to serialize event detail: {}", e);
        serde_json::Value::Null
    })
}

/// Whether `element` is `ancestor` or lies inside it
fn is_within(dom: &dyn DomRead, element: ElementId, ancestor: ElementId) -> bool {
    let mut current = Some(element);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = dom.parent(id);
    }
    false
}
