use log::Level;
use serde::Deserialize;

use crate::error::Error;

/// Id of the optional `<script type="application/json">` block carrying overrides.
pub const CONFIG_ELEMENT_ID: &str = "landing-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose when running a dev build locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for every behavior on the page. Distances are CSS pixels,
/// durations milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Scroll offset past which the nav bar turns frosted.
    pub scroll_threshold: f64,
    /// Height of the fixed nav bar that anchor scrolling compensates for.
    pub nav_offset: f64,
    /// Fraction of a section that must be visible before it is revealed.
    pub reveal_threshold: f64,
    /// How far the bottom of the viewport is pulled in for reveal checks.
    pub reveal_bottom_margin: f64,
    /// Widest viewport that still gets the mobile menu toggle.
    pub mobile_breakpoint: f64,
    pub press_feedback_ms: u32,
    pub modal_transition_ms: u32,
    pub enter_delay_ms: u32,
    pub toast_duration_ms: u32,
    pub scroll_debounce_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_threshold: 100.0,
            nav_offset: 80.0,
            reveal_threshold: 0.1,
            reveal_bottom_margin: 50.0,
            mobile_breakpoint: 768.0,
            press_feedback_ms: 150,
            modal_transition_ms: 300,
            enter_delay_ms: 10,
            toast_duration_ms: 3000,
            scroll_debounce_ms: 10,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(Error::InvalidConfig(format!(
                "revealThreshold must be within 0..=1, got {}",
                self.reveal_threshold
            )));
        }
        let distances = [
            ("scrollThreshold", self.scroll_threshold),
            ("navOffset", self.nav_offset),
            ("revealBottomMargin", self.reveal_bottom_margin),
            ("mobileBreakpoint", self.mobile_breakpoint),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Root margin string handed to the intersection watcher.
    pub fn reveal_root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.reveal_bottom_margin)
    }
}
