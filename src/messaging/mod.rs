/// Messaging module for Event/Command architecture
///
/// - **Events**: notifications of completed wizard transitions (past tense, broadcast)
/// - **Commands**: requests to move a wizard (imperative, queued)
///
/// ## Architecture
///
/// ```text
/// ┌─────────┐     Command      ┌────────────┐     Event      ┌─────────────┐
/// │  Host   │ ───────────────> │ Controller │ ─────────────> │  Event Bus  │
/// │ (clicks,│   CommandQueue   │            │                │             │
/// │  pops)  │                  └────────────┘                └─────────────┘
/// └─────────┘                                                       │
///                                                                   ▼
///                                                             ┌──────────┐
///                                                             │ Handlers │
///                                                             └──────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let (rx, _id) = controller.events().subscribe();
///
/// controller.commands().submit(Command::Next { wizard: id.clone() });
/// controller.process_commands()?;
///
/// while let Ok(event) = rx.try_recv() {
///     if let WizardEvent::PageChanged(change) = event {
///         // react to change.current / change.previous
///     }
/// }
/// ```

pub mod events;
pub mod commands;
pub mod bus;

// Re-export commonly used types
pub use events::{InfoObject, PageChanged, WizardEvent};
pub use commands::{Command, CommandQueue};
pub use bus::{EventBus, SubscriberId};
