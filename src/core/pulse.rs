//! Pulse construction: scheduled uses to consume/recover events per resource.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DefinitionTable;
use crate::core::ScheduledUse;
use crate::util::{GroupId, OwnerScope, SkillId, TimestampMs, UseId};

/// A tracked charge pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResourceKey {
    /// A skill's own charges for one owner.
    Skill {
        /// Skill identifier.
        skill: SkillId,
        /// Owner scope.
        owner: Option<OwnerScope>,
    },
    /// A shared group's charges for one owner.
    Group {
        /// Group identifier.
        group: GroupId,
        /// Owner scope.
        owner: Option<OwnerScope>,
    },
}

impl ResourceKey {
    /// Owner scope of the pool.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Skill { owner, .. } | Self::Group { owner, .. } => owner.as_deref(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, id, owner) = match self {
            Self::Skill { skill, owner } => ("skill", skill, owner),
            Self::Group { group, owner } => ("group", group, owner),
        };
        match owner {
            Some(owner) => write!(f, "{label}:{id}@{owner}"),
            None => write!(f, "{label}:{id}"),
        }
    }
}

/// Direction of a charge change.
///
/// Variant order is the tie-break at equal timestamps: a charge recovering at
/// the instant of a new use is available to that use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    /// One charge returns.
    Recover,
    /// One charge is spent.
    Consume,
}

/// A time-stamped charge change on one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse {
    /// When the change happens.
    pub at: TimestampMs,
    /// Consume or recover.
    pub kind: PulseKind,
    /// Affected pool.
    pub resource: ResourceKey,
    /// Use that produced the pulse.
    pub use_id: UseId,
    /// Input position of that use; tells apart uses sharing an id.
    pub seq: usize,
}

/// Static facts about a resource needed by later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProfile {
    /// Charges at the start of the timeline.
    pub capacity: u32,
    /// Recharge time of one charge.
    pub cooldown_ms: TimestampMs,
    /// Skills whose availability this pool constrains.
    pub affects: Vec<SkillId>,
}

/// Why a use was left out of the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DiagnosticReason {
    /// The skill id is not in the definition table.
    UnknownSkill,
    /// The skill's cooldown group is not in the definition table.
    UnknownGroup {
        /// Missing group identifier.
        group: GroupId,
    },
}

/// A use excluded from the computation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Skipped use.
    pub use_id: UseId,
    /// Skill the use names.
    pub skill_id: SkillId,
    /// Why it was skipped.
    pub reason: DiagnosticReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DiagnosticReason::UnknownSkill => {
                write!(f, "use {} skipped: unknown skill `{}`", self.use_id, self.skill_id)
            }
            DiagnosticReason::UnknownGroup { group } => write!(
                f,
                "use {} skipped: skill `{}` references unknown group `{group}`",
                self.use_id, self.skill_id
            ),
        }
    }
}

/// Output of [`build_pulses`].
#[derive(Debug, Clone, Default)]
pub struct PulsePlan {
    /// Pulses sorted by time, recover before consume, then by resource, use id,
    /// and input position.
    pub pulses: Vec<Pulse>,
    /// Every resource referenced by a pulse.
    pub resources: HashMap<ResourceKey, ResourceProfile>,
    /// Uses that could not be resolved, by use id.
    pub diagnostics: Vec<Diagnostic>,
}

impl PulsePlan {
    fn push_pair(
        &mut self,
        seq: usize,
        scheduled: &ScheduledUse,
        resource: ResourceKey,
        profile: ResourceProfile,
    ) {
        let recover_at = scheduled.start_ms + profile.cooldown_ms;
        self.pulses.push(Pulse {
            at: scheduled.start_ms,
            kind: PulseKind::Consume,
            resource: resource.clone(),
            use_id: scheduled.id.clone(),
            seq,
        });
        self.pulses.push(Pulse {
            at: recover_at,
            kind: PulseKind::Recover,
            resource: resource.clone(),
            use_id: scheduled.id.clone(),
            seq,
        });
        self.resources.entry(resource).or_insert(profile);
    }

    fn sort(&mut self) {
        self.pulses.sort_by(|a, b| {
            a.at.cmp(&b.at)
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.resource.cmp(&b.resource))
                .then_with(|| a.use_id.cmp(&b.use_id))
                .then(a.seq.cmp(&b.seq))
        });
        self.diagnostics.sort_by(|a, b| a.use_id.cmp(&b.use_id));
    }
}

/// Expand every use into consume/recover pulses on its skill pool and, when
/// the skill is grouped, on the group pool. Unresolvable uses are skipped and
/// reported as diagnostics.
#[must_use]
pub fn build_pulses(uses: &[ScheduledUse], table: &DefinitionTable) -> PulsePlan {
    let mut plan = PulsePlan::default();

    for (seq, scheduled) in uses.iter().enumerate() {
        let Some(skill) = table.skill(&scheduled.skill_id) else {
            tracing::warn!("use {} names unknown skill `{}`", scheduled.id, scheduled.skill_id);
            plan.diagnostics.push(Diagnostic {
                use_id: scheduled.id.clone(),
                skill_id: scheduled.skill_id.clone(),
                reason: DiagnosticReason::UnknownSkill,
            });
            continue;
        };

        let group = match &skill.cooldown_group {
            None => None,
            Some(group_id) => {
                if let Some(group) = table.group(group_id) {
                    Some(group)
                } else {
                    tracing::warn!(
                        "use {} skipped: skill `{}` references unknown group `{group_id}`",
                        scheduled.id,
                        skill.id
                    );
                    plan.diagnostics.push(Diagnostic {
                        use_id: scheduled.id.clone(),
                        skill_id: skill.id.clone(),
                        reason: DiagnosticReason::UnknownGroup {
                            group: group_id.clone(),
                        },
                    });
                    continue;
                }
            }
        };

        plan.push_pair(
            seq,
            scheduled,
            ResourceKey::Skill {
                skill: skill.id.clone(),
                owner: scheduled.owner.clone(),
            },
            ResourceProfile {
                capacity: skill.stack,
                cooldown_ms: skill.cooldown_ms(),
                affects: vec![skill.id.clone()],
            },
        );

        if let Some(group) = group {
            plan.push_pair(
                seq,
                scheduled,
                ResourceKey::Group {
                    group: group.id.clone(),
                    owner: scheduled.owner.clone(),
                },
                ResourceProfile {
                    capacity: group.stack,
                    cooldown_ms: group.cooldown_ms(),
                    affects: table.group_members(&group.id).to_vec(),
                },
            );
        }
    }

    plan.sort();
    tracing::debug!(
        "built {} pulses over {} resources ({} uses skipped)",
        plan.pulses.len(),
        plan.resources.len(),
        plan.diagnostics.len()
    );
    plan
}
