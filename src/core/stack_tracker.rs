//! Charge replay and edge detection.
//!
//! Pulses are replayed in order against one counter per resource, starting at
//! the resource's capacity. The stages after this one only care about two
//! moments: the last charge being spent and the first charge coming back.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{PulseKind, PulsePlan, ResourceKey};
use crate::util::{SkillId, TimestampMs, UseId};

/// Charge-count transitions that bound availability windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// A consume took the count from 1 to 0.
    Depleted,
    /// A recover took the count from 0 to 1.
    Restored,
}

/// A detected transition on one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Resource whose count changed.
    pub resource: ResourceKey,
    /// Falling or rising.
    pub kind: EdgeKind,
    /// When it happened.
    pub at: TimestampMs,
}

/// A resource whose schedule asks for more charges than it can supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    /// Exhausted pool.
    pub resource: ResourceKey,
    /// Skills constrained by the pool, sorted.
    pub skills: Vec<SkillId>,
    /// Timestamp of the first over-budget consume.
    pub first_failure_ms: TimestampMs,
    /// Every use that found the pool empty, in replay order.
    pub offending_uses: Vec<UseId>,
}

impl ResourceFailure {
    /// Whether this failure constrains `skill` for `owner`.
    #[must_use]
    pub fn affects(&self, skill: &str, owner: Option<&str>) -> bool {
        self.resource.owner() == owner && self.skills.iter().any(|s| s == skill)
    }
}

/// Output of [`track_stacks`].
#[derive(Debug, Clone, Default)]
pub struct StackReplay {
    /// Edges in replay order.
    pub edges: Vec<Edge>,
    /// Failed resources, ordered by resource key.
    pub failures: Vec<ResourceFailure>,
}

impl StackReplay {
    /// Whether the given resource failed during replay.
    #[must_use]
    pub fn is_failed(&self, resource: &ResourceKey) -> bool {
        self.failures.iter().any(|f| &f.resource == resource)
    }
}

#[derive(Debug)]
struct ChargeCounter {
    charges: u32,
    /// Input positions of uses whose consume found no charge; their recovers
    /// are ignored.
    rejected: HashSet<usize>,
    failure: Option<ResourceFailure>,
}

impl ChargeCounter {
    fn new(capacity: u32) -> Self {
        Self {
            charges: capacity,
            rejected: HashSet::new(),
            failure: None,
        }
    }
}

/// Replay the plan's pulses and report depletion/restoration edges.
///
/// A consume against an empty pool never drives the count below zero: the use
/// is recorded on the resource's [`ResourceFailure`] and dropped from the
/// replay, along with its later recover, so every offending use is reported.
/// Callers decide whether the surviving edges of a failed resource are usable.
#[must_use]
pub fn track_stacks(plan: &PulsePlan) -> StackReplay {
    let mut counters: BTreeMap<&ResourceKey, ChargeCounter> = BTreeMap::new();
    let mut edges = Vec::new();

    for pulse in &plan.pulses {
        let Some(profile) = plan.resources.get(&pulse.resource) else {
            tracing::error!("pulse references unregistered resource {}", pulse.resource);
            continue;
        };
        let counter = counters
            .entry(&pulse.resource)
            .or_insert_with(|| ChargeCounter::new(profile.capacity));

        match pulse.kind {
            PulseKind::Consume => {
                if counter.charges == 0 {
                    counter.rejected.insert(pulse.seq);
                    let failure = counter.failure.get_or_insert_with(|| {
                        let mut skills = profile.affects.clone();
                        skills.sort();
                        ResourceFailure {
                            resource: pulse.resource.clone(),
                            skills,
                            first_failure_ms: pulse.at,
                            offending_uses: Vec::new(),
                        }
                    });
                    failure.offending_uses.push(pulse.use_id.clone());
                    continue;
                }
                counter.charges -= 1;
                if counter.charges == 0 {
                    edges.push(Edge {
                        resource: pulse.resource.clone(),
                        kind: EdgeKind::Depleted,
                        at: pulse.at,
                    });
                }
            }
            PulseKind::Recover => {
                if counter.rejected.remove(&pulse.seq) {
                    continue;
                }
                counter.charges += 1;
                debug_assert!(counter.charges <= profile.capacity);
                if counter.charges == 1 {
                    edges.push(Edge {
                        resource: pulse.resource.clone(),
                        kind: EdgeKind::Restored,
                        at: pulse.at,
                    });
                }
            }
        }
    }

    let failures: Vec<ResourceFailure> = counters
        .into_values()
        .filter_map(|counter| counter.failure)
        .collect();
    for failure in &failures {
        tracing::warn!(
            "resource {} over-consumed at {}ms by {} use(s)",
            failure.resource,
            failure.first_failure_ms,
            failure.offending_uses.len()
        );
    }
    tracing::debug!("replayed {} pulses into {} edges", plan.pulses.len(), edges.len());

    StackReplay { edges, failures }
}
