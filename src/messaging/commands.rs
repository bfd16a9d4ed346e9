/// Command types for the wizard
///
/// Commands represent requests to move a wizard (imperative).
/// They queue up and are executed one at a time by the controller, so rapid
/// repeated requests never overlap.
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::dom::ElementId;
use crate::history::PopState;
use crate::wizard::StepTarget;

/// Wizard commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move one step forward (user-initiated)
    Next { wizard: String },

    /// Move one step back (user-initiated)
    Previous { wizard: String },

    /// Move to an index or a named step
    GoTo {
        wizard: String,
        target: StepTarget,
        user_initiated: bool,
    },

    /// A click somewhere inside a wizard
    Click { wizard: String, target: ElementId },

    /// The browser popped a history entry
    Pop(PopState),
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::Next { wizard } => format!("Next step: {}", wizard),
            Command::Previous { wizard } => format!("Previous step: {}", wizard),
            Command::GoTo { wizard, target, .. } => format!("Go to {}: {}", target, wizard),
            Command::Click { wizard, target } => format!("Click {}: {}", target, wizard),
            Command::Pop(_) => "History pop".to_string(),
        }
    }
}

/// FIFO of pending commands
pub struct CommandQueue {
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            command_tx: tx,
            command_rx: rx,
        }
    }

    /// Get a sender for submitting commands
    pub fn sender(&self) -> Sender<Command> {
        self.command_tx.clone()
    }

    pub fn submit(&self, command: Command) {
        // The queue owns a receiver, so sending cannot fail
        let _ = self.command_tx.send(command);
    }

    /// Take the next pending command, if any
    pub fn next(&self) -> Option<Command> {
        self.command_rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.command_rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.command_rx.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_description() {
        let cmd = Command::Next {
            wizard: "signup".to_string(),
        };
        assert_eq!(cmd.description(), "Next step: signup");

        let cmd = Command::GoTo {
            wizard: "signup".to_string(),
            target: StepTarget::from("pricing"),
            user_initiated: true,
        };
        assert_eq!(cmd.description(), "Go to pricing: signup");
    }

    #[test]
    fn test_queue_is_fifo() {
        let queue = CommandQueue::new();
        queue.submit(Command::Next {
            wizard: "a".to_string(),
        });
        queue.sender()
            .send(Command::Previous {
                wizard: "a".to_string(),
            })
            .unwrap();

        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.next(), Some(Command::Next { .. })));
        assert!(matches!(queue.next(), Some(Command::Previous { .. })));
        assert!(queue.next().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sender_works_across_threads() {
        let queue = CommandQueue::new();
        let sender = queue.sender();

        std::thread::spawn(move || {
            sender
                .send(Command::Pop(PopState::default()))
                .unwrap();
        })
        .join()
        .unwrap();

        assert!(matches!(queue.next(), Some(Command::Pop(_))));
    }
}
