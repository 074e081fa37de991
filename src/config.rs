//! Display configuration.
//!
//! The output surface is chosen once per process. `CRAMER_DISPLAY` forces a mode (`auto`,
//! `rich`, `text`); under `auto` rich rendering is used when running inside the evcxr Jupyter
//! kernel, which marks its runtime with `EVCXR_IS_RUNTIME`.

use std::str::FromStr;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::error::CramerError;

pub const DISPLAY_ENV: &str = "CRAMER_DISPLAY";
pub const EVCXR_RUNTIME_ENV: &str = "EVCXR_IS_RUNTIME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Auto,
    Rich,
    Text,
}

impl FromStr for DisplayMode {
    type Err = CramerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(DisplayMode::Auto),
            "rich" | "latex" | "notebook" => Ok(DisplayMode::Rich),
            "text" | "plain" => Ok(DisplayMode::Text),
            other => Err(CramerError::Config(format!(
                "{DISPLAY_ENV} must be one of auto, rich, text (got {other:?})"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_rich_display: bool,
}

impl Capabilities {
    /// Process-wide capabilities, detected on first use.
    pub fn get() -> Capabilities {
        static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();
        *CAPABILITIES.get_or_init(|| {
            let caps = Capabilities::detect();
            info!(rich = caps.has_rich_display, "selected display surface");
            caps
        })
    }

    /// Read the environment without caching.
    pub fn detect() -> Capabilities {
        let mode = match std::env::var(DISPLAY_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err: CramerError| {
                warn!(%err, "ignoring display override");
                DisplayMode::Auto
            }),
            Err(_) => DisplayMode::Auto,
        };
        Capabilities::from_mode(mode, std::env::var_os(EVCXR_RUNTIME_ENV).is_some())
    }

    pub fn from_mode(mode: DisplayMode, notebook_runtime: bool) -> Capabilities {
        let has_rich_display = match mode {
            DisplayMode::Auto => notebook_runtime,
            DisplayMode::Rich => true,
            DisplayMode::Text => false,
        };
        Capabilities { has_rich_display }
    }
}
