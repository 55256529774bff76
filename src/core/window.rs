//! Availability windows, the engine's output.

use serde::{Deserialize, Serialize};

use crate::core::{Diagnostic, EngineError, ResourceFailure};
use crate::util::{OwnerScope, SkillId, TimestampMs};

/// Why a skill is unavailable during a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// The last charge was spent and is recovering.
    Cooldown,
    /// A later scheduled use already needs the last charge.
    Unusable,
}

/// Half-open interval `[start_ms, end_ms)` during which a skill cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CooldownWindow {
    /// Blocked skill.
    pub skill_id: SkillId,
    /// Owner scope of the blocked skill.
    pub owner: Option<OwnerScope>,
    /// Cooldown or unusable.
    pub kind: WindowKind,
    /// Inclusive start.
    pub start_ms: TimestampMs,
    /// Exclusive end.
    pub end_ms: TimestampMs,
    /// Computed from a clamped replay of an over-consumed resource.
    #[serde(default)]
    pub degraded: bool,
}

impl CooldownWindow {
    /// Build a window, refusing empty or inverted intervals.
    pub fn new(
        skill_id: impl Into<SkillId>,
        owner: Option<OwnerScope>,
        kind: WindowKind,
        start_ms: TimestampMs,
        end_ms: TimestampMs,
    ) -> Result<Self, EngineError> {
        if end_ms <= start_ms {
            return Err(EngineError::MalformedInterval {
                start: start_ms,
                end: end_ms,
            });
        }
        Ok(Self {
            skill_id: skill_id.into(),
            owner,
            kind,
            start_ms,
            end_ms,
            degraded: false,
        })
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub const fn contains(&self, at: TimestampMs) -> bool {
        self.start_ms <= at && at < self.end_ms
    }

    /// Window length in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> TimestampMs {
        self.end_ms - self.start_ms
    }

    /// Whether the window belongs to `skill` for `owner`.
    #[must_use]
    pub fn is_for(&self, skill: &str, owner: Option<&str>) -> bool {
        self.skill_id == skill && self.owner.as_deref() == owner
    }
}

/// Result of one full computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSet {
    /// Windows sorted by start, then end, skill, owner, and kind.
    pub windows: Vec<CooldownWindow>,
    /// Resources whose schedule over-consumed their charges.
    pub failures: Vec<ResourceFailure>,
    /// Uses left out because their definitions could not be resolved.
    pub diagnostics: Vec<Diagnostic>,
}

impl WindowSet {
    /// Windows of one skill and owner, in start order.
    pub fn windows_for<'a>(
        &'a self,
        skill: &'a str,
        owner: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CooldownWindow> + 'a {
        self.windows.iter().filter(move |w| w.is_for(skill, owner))
    }

    /// The window blocking `skill` for `owner` at `at`, if any.
    ///
    /// Cooldown and unusable windows of the same skill never overlap, so at most
    /// one window matches.
    #[must_use]
    pub fn window_at(
        &self,
        skill: &str,
        owner: Option<&str>,
        at: TimestampMs,
    ) -> Option<&CooldownWindow> {
        self.windows
            .iter()
            .find(|w| w.is_for(skill, owner) && w.contains(at))
    }

    /// The failure affecting `skill` for `owner`, if any.
    #[must_use]
    pub fn failure_for(&self, skill: &str, owner: Option<&str>) -> Option<&ResourceFailure> {
        self.failures.iter().find(|f| f.affects(skill, owner))
    }

    /// Whether any resource failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}
