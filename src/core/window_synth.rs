//! Window synthesis: edges to raw cooldown/unusable windows.
//!
//! Every depletion at `t` on a pool with recharge time `d` blocks each skill the
//! pool affects in two ways: an unusable window `[t - d, t)` (a use in that span
//! would still be recharging when the charge is needed at `t`) and a cooldown
//! window opened at `t` and closed by the pool's next restoration.
//!
//! Each (skill, pool) pair is swept on its own lane with independent counters.
//! Within a lane cooldown outranks unusable: an unusable span is suspended while
//! a cooldown is open and resumes when it closes. Lanes of the same skill are
//! combined later by the cover resolver.

use std::collections::BTreeMap;

use crate::core::{
    CooldownWindow, Edge, EdgeKind, EngineError, PulsePlan, ResourceKey, WindowKind,
};
use crate::util::{SkillId, TimestampMs};

/// Opening or closing of a window on one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundaryKind {
    /// An unusable span begins.
    UnusedStart,
    /// An unusable span ends.
    UnusedEnd,
    /// A cooldown begins.
    CooldownStart,
    /// A cooldown ends.
    CooldownEnd,
}

/// A window boundary for one skill, derived from one pool's edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Pool whose edge produced the boundary.
    pub resource: ResourceKey,
    /// Skill the boundary applies to.
    pub skill: SkillId,
    /// Which boundary.
    pub kind: BoundaryKind,
    /// When it applies.
    pub at: TimestampMs,
}

/// Translate edges into per-skill boundaries.
#[must_use]
pub fn boundaries_from_edges(edges: &[Edge], plan: &PulsePlan) -> Vec<Boundary> {
    let mut boundaries = Vec::with_capacity(edges.len() * 3);

    for edge in edges {
        let Some(profile) = plan.resources.get(&edge.resource) else {
            continue;
        };
        for skill in &profile.affects {
            let mut push = |kind, at| {
                boundaries.push(Boundary {
                    resource: edge.resource.clone(),
                    skill: skill.clone(),
                    kind,
                    at,
                });
            };
            match edge.kind {
                EdgeKind::Depleted => {
                    push(BoundaryKind::UnusedStart, edge.at - profile.cooldown_ms);
                    push(BoundaryKind::UnusedEnd, edge.at);
                    push(BoundaryKind::CooldownStart, edge.at);
                }
                EdgeKind::Restored => push(BoundaryKind::CooldownEnd, edge.at),
            }
        }
    }
    boundaries
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Lane {
    skill: SkillId,
    resource: ResourceKey,
}

/// Open-window counters of one lane.
#[derive(Debug, Default)]
struct LaneTally {
    unusable: u32,
    cooldown: u32,
}

impl LaneTally {
    fn apply(&mut self, kind: BoundaryKind) -> Result<(), WindowKind> {
        match kind {
            BoundaryKind::UnusedStart => self.unusable += 1,
            BoundaryKind::CooldownStart => self.cooldown += 1,
            BoundaryKind::UnusedEnd => {
                self.unusable = self.unusable.checked_sub(1).ok_or(WindowKind::Unusable)?;
            }
            BoundaryKind::CooldownEnd => {
                self.cooldown = self.cooldown.checked_sub(1).ok_or(WindowKind::Cooldown)?;
            }
        }
        Ok(())
    }

    const fn dominant(&self) -> Option<WindowKind> {
        if self.cooldown > 0 {
            Some(WindowKind::Cooldown)
        } else if self.unusable > 0 {
            Some(WindowKind::Unusable)
        } else {
            None
        }
    }
}

fn sweep_lane(
    lane: &Lane,
    boundaries: &[Boundary],
    out: &mut Vec<CooldownWindow>,
) -> Result<(), EngineError> {
    let owner = lane.resource.owner().map(str::to_owned);
    let mut tally = LaneTally::default();
    let mut open: Option<(WindowKind, TimestampMs)> = None;

    // Boundaries sharing a timestamp are applied together so a window closed
    // and reopened at the same instant stays one window.
    for instant in boundaries.chunk_by(|a, b| a.at == b.at) {
        let at = instant[0].at;
        for boundary in instant {
            tally
                .apply(boundary.kind)
                .map_err(|kind| EngineError::UnbalancedBoundary {
                    skill: lane.skill.clone(),
                    kind,
                    at,
                })?;
        }

        let wanted = tally.dominant();
        if wanted != open.map(|(kind, _)| kind) {
            if let Some((kind, since)) = open.take() {
                out.push(CooldownWindow::new(
                    lane.skill.clone(),
                    owner.clone(),
                    kind,
                    since,
                    at,
                )?);
            }
            open = wanted.map(|kind| (kind, at));
        }
    }

    match open {
        Some((kind, since)) => Err(EngineError::UnclosedWindow {
            skill: lane.skill.clone(),
            kind,
            since,
        }),
        None => Ok(()),
    }
}

/// Turn a replay's edges into raw windows, one sweep per (skill, pool) lane.
///
/// Windows of different lanes may overlap; see [`crate::core::resolve_cover`].
pub fn synthesize_windows(
    edges: &[Edge],
    plan: &PulsePlan,
) -> Result<Vec<CooldownWindow>, EngineError> {
    let mut lanes: BTreeMap<Lane, Vec<Boundary>> = BTreeMap::new();
    for boundary in boundaries_from_edges(edges, plan) {
        lanes
            .entry(Lane {
                skill: boundary.skill.clone(),
                resource: boundary.resource.clone(),
            })
            .or_default()
            .push(boundary);
    }

    let mut windows = Vec::new();
    for (lane, mut boundaries) in lanes {
        boundaries.sort_by_key(|b| (b.at, b.kind));
        sweep_lane(&lane, &boundaries, &mut windows)?;
    }
    tracing::debug!("synthesized {} raw windows", windows.len());
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::DefinitionTableBuilder;
    use crate::config::DefinitionTable;
    use crate::core::{build_pulses, track_stacks, ScheduledUse};

    fn table() -> DefinitionTable {
        DefinitionTableBuilder::new()
            .skill("reprisal", 60.0)
            .stacked_skill("oblation", 60.0, 2)
            .group("heart", 25.0, 1)
            .grouped_skill("heart_of_stone", 10.0, "heart")
            .grouped_skill("heart_of_corundum", 10.0, "heart")
            .build()
            .unwrap()
    }

    fn raw(uses: &[ScheduledUse]) -> Vec<(String, WindowKind, TimestampMs, TimestampMs)> {
        let plan = build_pulses(uses, &table());
        let replay = track_stacks(&plan);
        synthesize_windows(&replay.edges, &plan)
            .unwrap()
            .into_iter()
            .map(|w| (w.skill_id, w.kind, w.start_ms, w.end_ms))
            .collect()
    }

    #[test]
    fn test_depletion_backdates_unusable_and_opens_cooldown() {
        let windows = raw(&[ScheduledUse::with_id("u1", "reprisal", None, 100_000)]);
        assert_eq!(
            windows,
            vec![
                ("reprisal".to_string(), WindowKind::Unusable, 40_000, 100_000),
                ("reprisal".to_string(), WindowKind::Cooldown, 100_000, 160_000),
            ]
        );
    }

    #[test]
    fn test_cooldown_suspends_overlapping_unusable() {
        // The second use's backdated span starts inside the first cooldown.
        let windows = raw(&[
            ScheduledUse::with_id("u1", "reprisal", None, 0),
            ScheduledUse::with_id("u2", "reprisal", None, 100_000),
        ]);
        assert_eq!(
            windows,
            vec![
                ("reprisal".to_string(), WindowKind::Unusable, -60_000, 0),
                ("reprisal".to_string(), WindowKind::Cooldown, 0, 60_000),
                ("reprisal".to_string(), WindowKind::Unusable, 60_000, 100_000),
                ("reprisal".to_string(), WindowKind::Cooldown, 100_000, 160_000),
            ]
        );
    }

    #[test]
    fn test_back_to_back_cooldowns_stay_one_window() {
        let windows = raw(&[
            ScheduledUse::with_id("u1", "reprisal", None, 0),
            ScheduledUse::with_id("u2", "reprisal", None, 60_000),
        ]);
        assert_eq!(
            windows,
            vec![
                ("reprisal".to_string(), WindowKind::Unusable, -60_000, 0),
                ("reprisal".to_string(), WindowKind::Cooldown, 0, 120_000),
            ]
        );
    }

    #[test]
    fn test_stacked_skill_cooldown_ends_at_first_recovery() {
        let windows = raw(&[
            ScheduledUse::with_id("u1", "oblation", None, 10_000),
            ScheduledUse::with_id("u2", "oblation", None, 30_000),
        ]);
        assert_eq!(
            windows,
            vec![
                ("oblation".to_string(), WindowKind::Unusable, -30_000, 30_000),
                ("oblation".to_string(), WindowKind::Cooldown, 30_000, 70_000),
            ]
        );
    }

    #[test]
    fn test_group_depletion_reaches_every_member() {
        let windows = raw(&[ScheduledUse::with_id("u1", "heart_of_stone", None, 0)]);
        let corundum: Vec<_> = windows
            .iter()
            .filter(|w| w.0 == "heart_of_corundum")
            .map(|w| (w.1, w.2, w.3))
            .collect();
        assert_eq!(
            corundum,
            vec![
                (WindowKind::Unusable, -25_000, 0),
                (WindowKind::Cooldown, 0, 25_000),
            ]
        );
        // heart_of_stone has both its own lane and the group lane.
        assert_eq!(windows.iter().filter(|w| w.0 == "heart_of_stone").count(), 4);
    }

    #[test]
    fn test_unmatched_close_is_an_internal_error() {
        let plan = build_pulses(&[ScheduledUse::with_id("u1", "reprisal", None, 0)], &table());
        let stray = Edge {
            resource: ResourceKey::Skill {
                skill: "reprisal".into(),
                owner: None,
            },
            kind: EdgeKind::Restored,
            at: 5,
        };
        assert!(matches!(
            synthesize_windows(&[stray], &plan),
            Err(EngineError::UnbalancedBoundary { .. })
        ));
    }
}
