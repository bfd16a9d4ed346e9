use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{error, info};

use identity_wizard::dom::{MemoryDocument, WizardMarkup};
use identity_wizard::history::MemoryHistory;
use identity_wizard::logging::initialize_tracing;
use identity_wizard::messaging::Command;
use identity_wizard::scroll::RecordingScroller;
use identity_wizard::{AppResult, StepTarget, WizardConfig, WizardController, WizardEvent};

type DemoController = WizardController<MemoryDocument, MemoryHistory, RecordingScroller>;

const DEFAULT_STEPS: &str = "account,details,pricing,confirm";
const DEFAULT_SCRIPT: &str = "next,next,back,goto:pricing,forward,goto:99,prev";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    steps: Option<String>,
    script: Option<String>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> AppResult<Self> {
        let mut options = Options::default();
        let mut args = args.skip(1);
        while let Some(arg) = args.next() {
            let mut value = || args.next().with_context(|| format!("{} needs a value", arg));
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value()?)),
                "--steps" => options.steps = Some(value()?),
                "--script" => options.script = Some(value()?),
                other => bail!("Unknown argument: {}", other),
            }
        }
        Ok(options)
    }
}

fn main() {
    initialize_tracing();

    if let Err(e) = run() {
        error!("Demo failed: {:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let options = Options::parse(std::env::args())?;

    let config_path = options.config.clone().or_else(WizardConfig::default_path);
    let config = match &config_path {
        Some(path) => WizardConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => WizardConfig::default(),
    };
    info!(
        animation_ms = config.timings.animation_ms,
        event = %config.event_name,
        "Configuration loaded"
    );

    let steps = options.steps.as_deref().unwrap_or(DEFAULT_STEPS);
    let mut markup = WizardMarkup::new().id("signup").top(480.0);
    for name in steps.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        markup = markup.named_step(name);
    }

    let mut doc = MemoryDocument::new();
    let wizard = markup.build(&mut doc, &config);
    doc.set_scroll_y(900.0);

    let mut controller =
        WizardController::new(doc, MemoryHistory::new(), RecordingScroller::new(), config);
    let (events, _subscription) = controller.events().subscribe();

    let id = controller
        .enhance(wizard.container)
        .context("Failed to enhance wizard")?;
    report(&controller, &id);

    let script = options.script.as_deref().unwrap_or(DEFAULT_SCRIPT);
    for action in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        run_action(&mut controller, &id, action)?;
        controller.run_until_idle();
        report(&controller, &id);
    }

    while let Ok(event) = events.try_recv() {
        if let WizardEvent::PageChanged(change) = &event {
            println!("  event {}", serde_json::to_string(change)?);
        } else {
            println!("  event {}", event.description());
        }
    }
    println!(
        "  {} scroll request(s), {} history entries",
        controller.scroller().requests().len(),
        controller.history().len()
    );

    Ok(())
}

fn run_action(controller: &mut DemoController, id: &str, action: &str) -> AppResult<()> {
    println!("> {}", action);
    let wizard = id.to_string();

    match action.split_once(':') {
        Some(("goto", target)) => {
            let target = match target.parse::<i64>() {
                Ok(index) => StepTarget::Index(index),
                Err(_) => StepTarget::from(target),
            };
            controller.commands().submit(Command::GoTo {
                wizard,
                target,
                user_initiated: true,
            });
        }
        _ => match action {
            "next" => controller.commands().submit(Command::Next { wizard }),
            "prev" => controller.commands().submit(Command::Previous { wizard }),
            "back" | "forward" => {
                let pop = if action == "back" {
                    controller.history_mut().back()
                } else {
                    controller.history_mut().forward()
                };
                match pop {
                    Some(pop) => controller.commands().submit(Command::Pop(pop)),
                    None => println!("  nothing to go {} to", action),
                }
            }
            other => bail!("Unknown action: {}", other),
        },
    }

    controller
        .process_commands()
        .with_context(|| format!("Action '{}' failed", action))?;
    Ok(())
}

fn report(controller: &DemoController, id: &str) {
    if let Some(state) = controller.state(id) {
        println!(
            "  {} at {} ({})",
            id,
            state.counter_text(),
            state.position_name().unwrap_or("-")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        std::iter::once("demo".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(args(&["--steps", "a,b", "--script", "next"])).unwrap();
        assert_eq!(options.steps.as_deref(), Some("a,b"));
        assert_eq!(options.script.as_deref(), Some("next"));
        assert!(options.config.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing_values() {
        assert!(Options::parse(args(&["--verbose"])).is_err());
        assert!(Options::parse(args(&["--steps"])).is_err());
    }
}
