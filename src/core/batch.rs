//! All-or-nothing validation of several placements at once.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{DefinitionTable, NegativeChargePolicy};
use crate::core::{
    build_pulses, track_stacks, AvailabilityEngine, EngineError, ResourceFailure, ResourceKey,
    ScheduledUse, WindowKind,
};
use crate::util::{GroupId, SkillId, TimestampMs, UseId};

/// Why one proposed placement is illegal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ConflictReason {
    /// The start falls inside a window computed from the rest of the schedule.
    Blocked {
        /// Kind of the blocking window.
        kind: WindowKind,
        /// Blocking window start.
        start_ms: TimestampMs,
        /// Blocking window end.
        end_ms: TimestampMs,
    },
    /// The start is before the pull and negative starts are not allowed.
    NegativeStart,
    /// The skill is not in the definition table.
    UnknownSkill,
    /// The skill's cooldown group is not in the definition table.
    UnknownGroup {
        /// Missing group identifier.
        group: GroupId,
    },
    /// The skill's pools are already over-consumed by the rest of the schedule.
    InconsistentSchedule,
    /// The placements are individually legal but together exhaust a pool.
    Overcommitted {
        /// Pool that ran out.
        resource: ResourceKey,
    },
}

/// A rejected placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Proposed use.
    pub use_id: UseId,
    /// Its skill.
    pub skill_id: SkillId,
    /// Proposed start.
    pub start_ms: TimestampMs,
    /// What is wrong with it.
    pub reason: ConflictReason,
}

impl Conflict {
    fn new(proposed: &ScheduledUse, reason: ConflictReason) -> Self {
        Self {
            use_id: proposed.id.clone(),
            skill_id: proposed.skill_id.clone(),
            start_ms: proposed.start_ms,
            reason,
        }
    }
}

/// Outcome of a batch check. Rejection applies to the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum BatchDecision {
    /// Every placement is legal together.
    Accepted {
        /// The placements, as proposed.
        placements: Vec<ScheduledUse>,
    },
    /// At least one placement is illegal; nothing may be applied.
    Rejected {
        /// Every conflict found.
        conflicts: Vec<Conflict>,
    },
}

impl BatchDecision {
    /// Whether the batch was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Conflicts of a rejected batch; empty when accepted.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Self::Accepted { .. } => &[],
            Self::Rejected { conflicts } => conflicts,
        }
    }

    /// The schedule with every placement applied, or `None` if rejected.
    ///
    /// Placements replace uses with the same id in place; new ids are appended.
    #[must_use]
    pub fn apply_to(&self, schedule: &[ScheduledUse]) -> Option<Vec<ScheduledUse>> {
        let Self::Accepted { placements } = self else {
            return None;
        };
        let by_id: HashMap<&str, &ScheduledUse> =
            placements.iter().map(|p| (p.id.as_str(), p)).collect();
        let existing: HashSet<&str> = schedule.iter().map(|u| u.id.as_str()).collect();

        let mut updated: Vec<ScheduledUse> = schedule
            .iter()
            .map(|u| by_id.get(u.id.as_str()).map_or_else(|| u.clone(), |p| (*p).clone()))
            .collect();
        updated.extend(
            placements
                .iter()
                .filter(|p| !existing.contains(p.id.as_str()))
                .cloned(),
        );
        Some(updated)
    }
}

fn touches(table: &DefinitionTable, scheduled: &ScheduledUse, resource: &ResourceKey) -> bool {
    if resource.owner() != scheduled.owner() {
        return false;
    }
    match resource {
        ResourceKey::Skill { skill, .. } => *skill == scheduled.skill_id,
        ResourceKey::Group { group, .. } => table
            .skill(&scheduled.skill_id)
            .and_then(|s| s.cooldown_group.as_ref())
            .is_some_and(|g| g == group),
    }
}

impl AvailabilityEngine<'_> {
    /// Validate `proposed` against `rest` of the schedule.
    ///
    /// Each placement is tested against windows computed from `rest` alone
    /// (uses in `rest` sharing an id with a proposed use are ignored). When all
    /// pass, the combined schedule is replayed so placements that only collide
    /// with each other are caught too.
    pub fn check_batch(
        &self,
        proposed: &[ScheduledUse],
        rest: &[ScheduledUse],
    ) -> Result<BatchDecision, EngineError> {
        let proposed_ids: HashSet<&str> = proposed.iter().map(|p| p.id.as_str()).collect();
        let rest: Vec<ScheduledUse> = rest
            .iter()
            .filter(|u| !proposed_ids.contains(u.id.as_str()))
            .cloned()
            .collect();
        let reduced = self.compute_windows(&rest)?;
        let isolate = self.settings().negative_charge == NegativeChargePolicy::Isolate;

        let mut conflicts = Vec::new();
        for placement in proposed {
            let reason = if self.table().skill(&placement.skill_id).is_none() {
                Some(ConflictReason::UnknownSkill)
            } else if let Some(group) = self.table().unresolved_group(&placement.skill_id) {
                Some(ConflictReason::UnknownGroup {
                    group: group.clone(),
                })
            } else if placement.start_ms < 0 && !self.settings().allow_negative_start {
                Some(ConflictReason::NegativeStart)
            } else if isolate
                && reduced
                    .failure_for(&placement.skill_id, placement.owner())
                    .is_some()
            {
                Some(ConflictReason::InconsistentSchedule)
            } else {
                reduced
                    .window_at(&placement.skill_id, placement.owner(), placement.start_ms)
                    .map(|w| ConflictReason::Blocked {
                        kind: w.kind,
                        start_ms: w.start_ms,
                        end_ms: w.end_ms,
                    })
            };
            if let Some(reason) = reason {
                conflicts.push(Conflict::new(placement, reason));
            }
        }

        if conflicts.is_empty() {
            conflicts = self.overcommitted(proposed, &rest, &reduced.failures);
        }

        if conflicts.is_empty() {
            tracing::debug!("batch of {} placement(s) accepted", proposed.len());
            Ok(BatchDecision::Accepted {
                placements: proposed.to_vec(),
            })
        } else {
            tracing::info!(
                "batch of {} placement(s) rejected with {} conflict(s)",
                proposed.len(),
                conflicts.len()
            );
            Ok(BatchDecision::Rejected { conflicts })
        }
    }

    fn overcommitted(
        &self,
        proposed: &[ScheduledUse],
        rest: &[ScheduledUse],
        known: &[ResourceFailure],
    ) -> Vec<Conflict> {
        let combined: Vec<ScheduledUse> = rest.iter().chain(proposed).cloned().collect();
        let replay = track_stacks(&build_pulses(&combined, self.table()));

        let mut conflicts = Vec::new();
        for failure in &replay.failures {
            let known_offenders: HashSet<&str> = known
                .iter()
                .filter(|k| k.resource == failure.resource)
                .flat_map(|k| k.offending_uses.iter().map(String::as_str))
                .collect();
            // Only offenders the placements introduced count against the batch.
            if failure
                .offending_uses
                .iter()
                .all(|id| known_offenders.contains(id.as_str()))
            {
                continue;
            }
            for placement in proposed
                .iter()
                .filter(|p| touches(self.table(), p, &failure.resource))
            {
                conflicts.push(Conflict::new(
                    placement,
                    ConflictReason::Overcommitted {
                        resource: failure.resource.clone(),
                    },
                ));
            }
        }
        conflicts
    }

    /// Shift every selected use by `delta_ms` and validate the result as one
    /// batch against the unselected uses. Unknown ids are ignored.
    pub fn move_selection(
        &self,
        schedule: &[ScheduledUse],
        selected: &[UseId],
        delta_ms: TimestampMs,
    ) -> Result<BatchDecision, EngineError> {
        let (moving, rest): (Vec<&ScheduledUse>, Vec<&ScheduledUse>) =
            schedule.iter().partition(|u| selected.contains(&u.id));
        let proposed: Vec<ScheduledUse> = moving.iter().map(|u| u.shifted(delta_ms)).collect();
        let rest: Vec<ScheduledUse> = rest.into_iter().cloned().collect();

        tracing::debug!(
            "moving {} use(s) by {}ms against {} fixed use(s)",
            proposed.len(),
            delta_ms,
            rest.len()
        );
        self.check_batch(&proposed, &rest)
    }
}
