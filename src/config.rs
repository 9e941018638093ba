//! Site behavior and preview server configuration.
//!
//! Values come from environment variables on the preview server, which
//! publishes the site settings as JSON for the browser binding. In the browser
//! the defaults apply when that document is unavailable. Unparseable numbers
//! are rejected rather than silently replaced.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_THEME_KEY: &str = "portfolio-theme";
pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 900;
pub const DEFAULT_BACK_TO_TOP_PX: u32 = 120;
pub const DEFAULT_METER_THRESHOLD: f64 = 0.25;

pub const DEFAULT_SENDING_MESSAGE: &str = "Sending...";
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Υπήρξε πρόβλημα. Προσπάθησε ξανά.";
pub const DEFAULT_NETWORK_MESSAGE: &str = "Υπήρξε σφάλμα αποστολής. Προσπάθησε ξανά.";
pub const DEFAULT_CONTACT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONTACT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_PORT: u16 = 3000;
/// Path the preview server publishes the site config under.
pub const SITE_CONFIG_PATH: &str = "/portfolio-config.json";
pub const DEFAULT_SITE_DIR: &str = "site";

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// A variable is set but outside its allowed range.
    #[error("{var} out of range: {value:?} ({expected})")]
    OutOfRange { var: &'static str, value: String, expected: &'static str },
}

// =============================================================================
// SITE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Form endpoint; `None` means "use the form's own action".
    pub endpoint: Option<String>,
    pub sending_message: String,
    pub fallback_message: String,
    pub network_message: String,
    pub timeouts: ContactTimeouts,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            sending_message: DEFAULT_SENDING_MESSAGE.into(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.into(),
            network_message: DEFAULT_NETWORK_MESSAGE.into(),
            timeouts: ContactTimeouts {
                request_secs: DEFAULT_CONTACT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONTACT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

/// Behavior settings shared by the preview server (which publishes them at
/// [`SITE_CONFIG_PATH`]) and the browser binding (which reads them back).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub theme_key: String,
    pub mobile_breakpoint_px: u32,
    pub back_to_top_px: u32,
    pub meter_threshold: f64,
    pub contact: ContactConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_key: DEFAULT_THEME_KEY.into(),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            back_to_top_px: DEFAULT_BACK_TO_TOP_PX,
            meter_threshold: DEFAULT_METER_THRESHOLD,
            contact: ContactConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Build from environment variables.
    ///
    /// Optional:
    /// - `PORTFOLIO_THEME_KEY`: default `portfolio-theme`
    /// - `PORTFOLIO_MOBILE_BREAKPOINT_PX`: default 900
    /// - `PORTFOLIO_BACK_TO_TOP_PX`: default 120
    /// - `PORTFOLIO_METER_THRESHOLD`: 0.0..=1.0, default 0.25
    /// - `CONTACT_FORM_ENDPOINT`: overrides the form action
    /// - `CONTACT_SENDING_MESSAGE`, `CONTACT_FALLBACK_MESSAGE`,
    ///   `CONTACT_NETWORK_MESSAGE`: status strings
    /// - `CONTACT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CONTACT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ContactConfig::default();
        let meter_threshold = parse_var(&lookup, "PORTFOLIO_METER_THRESHOLD", DEFAULT_METER_THRESHOLD)?;
        if !(0.0..=1.0).contains(&meter_threshold) {
            return Err(ConfigError::OutOfRange {
                var: "PORTFOLIO_METER_THRESHOLD",
                value: meter_threshold.to_string(),
                expected: "0.0..=1.0",
            });
        }

        let contact = ContactConfig {
            endpoint: lookup("CONTACT_FORM_ENDPOINT").filter(|v| !v.trim().is_empty()),
            sending_message: lookup("CONTACT_SENDING_MESSAGE").unwrap_or(defaults.sending_message),
            fallback_message: lookup("CONTACT_FALLBACK_MESSAGE").unwrap_or(defaults.fallback_message),
            network_message: lookup("CONTACT_NETWORK_MESSAGE").unwrap_or(defaults.network_message),
            timeouts: ContactTimeouts {
                request_secs: parse_var(
                    &lookup,
                    "CONTACT_REQUEST_TIMEOUT_SECS",
                    DEFAULT_CONTACT_REQUEST_TIMEOUT_SECS,
                )?,
                connect_secs: parse_var(
                    &lookup,
                    "CONTACT_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONTACT_CONNECT_TIMEOUT_SECS,
                )?,
            },
        };

        Ok(Self {
            theme_key: lookup("PORTFOLIO_THEME_KEY").unwrap_or_else(|| DEFAULT_THEME_KEY.into()),
            mobile_breakpoint_px: parse_var(&lookup, "PORTFOLIO_MOBILE_BREAKPOINT_PX", DEFAULT_MOBILE_BREAKPOINT_PX)?,
            back_to_top_px: parse_var(&lookup, "PORTFOLIO_BACK_TO_TOP_PX", DEFAULT_BACK_TO_TOP_PX)?,
            meter_threshold,
            contact,
        })
    }
}

// =============================================================================
// PREVIEW SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub port: u16,
    pub site_dir: PathBuf,
}

impl PreviewConfig {
    /// Build from `PORT` (default 3000) and `SITE_DIR` (default `site`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            site_dir: lookup("SITE_DIR").map_or_else(|| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from),
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
