//! Error types for availability computations.

use thiserror::Error;

use crate::core::WindowKind;
use crate::util::{GroupId, OwnerScope, SkillId, TimestampMs};

/// Errors produced by the availability engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A use or query names a skill absent from the definition table.
    #[error("unknown skill: {0}")]
    UnknownSkill(SkillId),
    /// A skill references a cooldown group absent from the definition table.
    #[error("unknown cooldown group `{group}` referenced by skill `{skill}`")]
    UnknownGroup {
        /// Skill holding the dangling reference.
        skill: SkillId,
        /// Missing group identifier.
        group: GroupId,
    },
    /// Definition table failed validation.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
    /// The schedule consumes more charges than the skill's pools can supply.
    #[error("inconsistent schedule for skill `{skill}` (owner {owner:?}): charge pool exhausted")]
    InconsistentSchedule {
        /// Affected skill.
        skill: SkillId,
        /// Owner scope of the exhausted pool.
        owner: Option<OwnerScope>,
    },
    /// An interval with `end <= start` was about to be emitted.
    #[error("malformed interval [{start}, {end})")]
    MalformedInterval {
        /// Interval start.
        start: TimestampMs,
        /// Interval end.
        end: TimestampMs,
    },
    /// A boundary closed a window that was never opened.
    #[error("unbalanced {kind:?} boundary for skill `{skill}` at {at}")]
    UnbalancedBoundary {
        /// Affected skill.
        skill: SkillId,
        /// Window kind whose counter went negative.
        kind: WindowKind,
        /// Timestamp of the offending boundary.
        at: TimestampMs,
    },
    /// A window was still open after every boundary was replayed.
    #[error("{kind:?} window for skill `{skill}` opened at {since} never closed")]
    UnclosedWindow {
        /// Affected skill.
        skill: SkillId,
        /// Kind of the dangling window.
        kind: WindowKind,
        /// Opening timestamp.
        since: TimestampMs,
    },
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
