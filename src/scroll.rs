/// Smooth-scroll collaborator
///
/// The controller only decides *where* to scroll and asks the scroller to do
/// it. The request is best effort: nothing waits for it to finish.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ScrollConfig;

/// Easing curve requested from the scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

pub trait Scroller {
    fn scroll_to(&mut self, offset: f64, duration: Duration, easing: Easing);
}

/// Where to scroll so the wizard's top is in view.
///
/// A wizard that starts close to the top of the viewport scrolls to the very
/// top of the page; otherwise leave some breathing room above it.
pub fn scroll_target(bounding_top: f64, config: &ScrollConfig) -> f64 {
    if bounding_top < config.top_threshold {
        0.0
    } else {
        bounding_top - config.breathing_room
    }
}

/// A requested scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f64,
    pub duration: Duration,
    pub easing: Easing,
}

/// Scroller that records requests instead of animating
#[derive(Debug, Default)]
pub struct RecordingScroller {
    requests: Vec<ScrollRequest>,
}

impl RecordingScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    pub fn last(&self) -> Option<&ScrollRequest> {
        self.requests.last()
    }
}

impl Scroller for RecordingScroller {
    fn scroll_to(&mut self, offset: f64, duration: Duration, easing: Easing) {
        tracing::trace!(offset, ?duration, easing = easing.as_str(), "scroll requested");
        self.requests.push(ScrollRequest {
            offset,
            duration,
            easing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_target_near_top() {
        let config = ScrollConfig::default();
        assert_eq!(scroll_target(0.0, &config), 0.0);
        assert_eq!(scroll_target(119.0, &config), 0.0);
        assert_eq!(scroll_target(-300.0, &config), 0.0);
    }

    #[test]
    fn test_scroll_target_leaves_breathing_room() {
        let config = ScrollConfig::default();
        assert_eq!(scroll_target(120.0, &config), 100.0);
        assert_eq!(scroll_target(500.0, &config), 480.0);
    }

    #[test]
    fn test_recording_scroller() {
        let mut scroller = RecordingScroller::new();
        scroller.scroll_to(80.0, Duration::from_millis(250), Easing::Linear);

        let request = scroller.last().unwrap();
        assert_eq!(request.offset, 80.0);
        assert_eq!(request.duration, Duration::from_millis(250));
        assert_eq!(request.easing, Easing::Linear);
        assert_eq!(scroller.requests().len(), 1);
    }

    #[test]
    fn test_easing_names() {
        assert_eq!(Easing::Linear.as_str(), "linear");
        assert_eq!(
            serde_json::to_string(&Easing::EaseInOut).unwrap(),
            "\"ease-in-out\""
        );
    }
}
