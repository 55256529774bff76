//! Scheduled uses, the engine's input records.

use serde::{Deserialize, Serialize};

use crate::util::{new_use_id, OwnerScope, SkillId, TimestampMs, UseId};

/// A placed instance of a skill on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledUse {
    /// Unique use identifier.
    pub id: UseId,
    /// Skill being used.
    pub skill_id: SkillId,
    /// Owner scope; `None` is its own scope shared by all unowned uses.
    #[serde(default)]
    pub owner: Option<OwnerScope>,
    /// Start of the use in milliseconds.
    pub start_ms: TimestampMs,
}

impl ScheduledUse {
    /// Create a use with a freshly generated identifier.
    pub fn new(
        skill_id: impl Into<SkillId>,
        owner: Option<OwnerScope>,
        start_ms: TimestampMs,
    ) -> Self {
        Self::with_id(new_use_id(), skill_id, owner, start_ms)
    }

    /// Create a use with a caller-supplied identifier (log import, persisted state).
    pub fn with_id(
        id: impl Into<UseId>,
        skill_id: impl Into<SkillId>,
        owner: Option<OwnerScope>,
        start_ms: TimestampMs,
    ) -> Self {
        Self {
            id: id.into(),
            skill_id: skill_id.into(),
            owner,
            start_ms,
        }
    }

    /// Owner scope as a borrowed string.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Copy of this use moved by `delta_ms`.
    #[must_use]
    pub fn shifted(&self, delta_ms: TimestampMs) -> Self {
        self.moved_to(self.start_ms + delta_ms)
    }

    /// Copy of this use placed at `start_ms`.
    #[must_use]
    pub fn moved_to(&self, start_ms: TimestampMs) -> Self {
        Self {
            start_ms,
            ..self.clone()
        }
    }
}
