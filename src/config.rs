use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Animation and deferral timings, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long transition classes stay on a step before cleanup
    pub animation_ms: u64,

    /// Duration of the scroll-to-top animation
    pub scroll_ms: u64,

    /// Deferral before focusing the new step
    pub focus_delay_ms: u64,
}

impl Timings {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn scroll(&self) -> Duration {
        Duration::from_millis(self.scroll_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            animation_ms: 300,
            scroll_ms: 250,
            focus_delay_ms: 0,
        }
    }
}

/// Geometry used to pick the scroll target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Wizards whose top is closer than this to the viewport top scroll to 0
    pub top_threshold: f64,

    /// Space left above the wizard otherwise
    pub breathing_room: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            top_threshold: 120.0,
            breathing_room: 20.0,
        }
    }
}

/// Markup contract: class names the controller reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub container: String,
    pub completed: String,
    pub introduction: String,
    pub pager: String,
    pub next_trigger: String,
    pub prev_trigger: String,
    pub step: String,
    pub step_hidden: String,
    pub step_in: String,
    pub step_in_reverse: String,
    pub step_out: String,
    pub step_out_reverse: String,
}

impl ClassNames {
    /// All classes that mark a step as mid-transition
    pub fn transitions(&self) -> [&str; 4] {
        [
            &self.step_in,
            &self.step_in_reverse,
            &self.step_out,
            &self.step_out_reverse,
        ]
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            container: "identity-wizard".to_string(),
            completed: "identity-wizard--completed".to_string(),
            introduction: "identity-wizard--introduction".to_string(),
            pager: "identity-wizard__controls-pager".to_string(),
            next_trigger: "js-identity-wizard__next".to_string(),
            prev_trigger: "js-identity-wizard__prev".to_string(),
            step: "identity-wizard__step".to_string(),
            step_hidden: "identity-wizard__step--hidden".to_string(),
            step_in: "identity-wizard__step--in".to_string(),
            step_in_reverse: "identity-wizard__step--in-reverse".to_string(),
            step_out: "identity-wizard__step--out".to_string(),
            step_out_reverse: "identity-wizard__step--out-reverse".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub timings: Timings,

    pub scroll: ScrollConfig,

    pub classes: ClassNames,

    /// Identifier used when the container carries no `id`
    pub default_identifier: String,

    /// Name of the custom event dispatched after every transition
    pub event_name: String,

    /// Attribute carrying a step's stable name
    pub step_name_attribute: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        let classes = ClassNames::default();
        Self {
            timings: Timings::default(),
            scroll: ScrollConfig::default(),
            default_identifier: classes.container.clone(),
            classes,
            event_name: "wizardPageChanged".to_string(),
            step_name_attribute: "data-wizard-step-name".to_string(),
        }
    }
}

impl WizardConfig {
    /// Load configuration from a JSON file.
    /// Missing fields fall back to defaults; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No wizard config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: WizardConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;

        tracing::info!("Loaded wizard config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Reject configurations the controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_name.trim().is_empty() {
            return Err(ConfigError::Invalid("event_name must not be empty".to_string()));
        }
        if self.default_identifier.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_identifier must not be empty".to_string(),
            ));
        }
        if self.classes.step.trim().is_empty() {
            return Err(ConfigError::Invalid("classes.step must not be empty".to_string()));
        }
        if self.scroll.top_threshold < 0.0 || self.scroll.breathing_room < 0.0 {
            return Err(ConfigError::Invalid(
                "scroll distances must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Default location of the config file in the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("identity-wizard").join("wizard.json"))
    }
}
