//! Engine behaviour settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with a resource whose charge count would go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeChargePolicy {
    /// Emit no windows for any skill the failed resource affects.
    #[default]
    Isolate,
    /// Drop the over-budget uses from the replay and mark the affected windows degraded.
    ClampAndFlag,
}

impl FromStr for NegativeChargePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "clamp_and_flag" | "clamp" => Ok(Self::ClampAndFlag),
            other => Err(format!("unknown negative charge policy `{other}`")),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Handling of schedules that over-consume a charge pool.
    #[serde(default)]
    pub negative_charge: NegativeChargePolicy,
    /// Whether uses may be placed before the pull starts (timestamp < 0).
    #[serde(default)]
    pub allow_negative_start: bool,
}

impl EngineSettings {
    /// Environment variable selecting [`NegativeChargePolicy`].
    pub const ENV_NEGATIVE_CHARGE: &'static str = "MITIGATION_NEGATIVE_CHARGE";
    /// Environment variable toggling `allow_negative_start`.
    pub const ENV_ALLOW_NEGATIVE_START: &'static str = "MITIGATION_ALLOW_NEGATIVE_START";

    /// Read settings from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Missing keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(raw) = lookup(Self::ENV_NEGATIVE_CHARGE) {
            settings.negative_charge = raw
                .parse()
                .map_err(|e| format!("{}: {e}", Self::ENV_NEGATIVE_CHARGE))?;
        }
        if let Some(raw) = lookup(Self::ENV_ALLOW_NEGATIVE_START) {
            settings.allow_negative_start = parse_flag(&raw).ok_or_else(|| {
                format!(
                    "{}: expected a boolean, got `{raw}`",
                    Self::ENV_ALLOW_NEGATIVE_START
                )
            })?;
        }
        Ok(settings)
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
