//! Registry configuration types for MedRide.
//!
//! `RegistryConfig` represents the top-level `config.toml` that controls the
//! newly-added highlight lifetime, transition policy, display numbering and
//! date formatting.

use serde::{Deserialize, Serialize};

/// How the registry treats status changes missing from the lifecycle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Apply every requested transition regardless of the current status.
    #[default]
    Permissive,
    /// Reject transitions that are not edges of the lifecycle table.
    Strict,
}

/// Top-level configuration for the service registry.
///
/// Loaded from `~/.medride/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Lifetime of the newly-added designation in milliseconds.
    #[serde(default = "default_highlight_ttl_ms")]
    pub highlight_ttl_ms: u64,

    #[serde(default)]
    pub transition_policy: TransitionPolicy,

    /// Prefix of generated display numbers (`SRV-000001`).
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,

    /// First sequence value handed out.
    #[serde(default = "default_number_start")]
    pub number_start: u64,

    /// Capacity of the lifecycle event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    #[serde(default)]
    pub locale: LocaleConfig,
}

fn default_highlight_ttl_ms() -> u64 {
    3_000
}

fn default_number_prefix() -> String {
    "SRV".to_string()
}

fn default_number_start() -> u64 {
    1
}

fn default_event_capacity() -> usize {
    256
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            highlight_ttl_ms: default_highlight_ttl_ms(),
            transition_policy: TransitionPolicy::default(),
            number_prefix: default_number_prefix(),
            number_start: default_number_start(),
            event_capacity: default_event_capacity(),
            locale: LocaleConfig::default(),
        }
    }
}

/// Date/time display conventions (chrono `strftime` patterns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}
