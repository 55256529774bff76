//! Availability engine: full window computation and single-placement queries.

use crate::config::{DefinitionTable, EngineSettings, NegativeChargePolicy};
use crate::core::{
    build_pulses, resolve_cover, synthesize_windows, track_stacks, CooldownWindow, EngineError,
    ScheduledUse, WindowSet,
};
use crate::util::{TimestampMs, UseId};

/// Pure availability engine over an immutable definition table.
///
/// The engine keeps no state between calls; every operation recomputes from
/// the schedule snapshot it is given.
#[derive(Debug, Clone)]
pub struct AvailabilityEngine<'a> {
    table: &'a DefinitionTable,
    settings: EngineSettings,
}

impl<'a> AvailabilityEngine<'a> {
    /// Create an engine with default settings.
    #[must_use]
    pub fn new(table: &'a DefinitionTable) -> Self {
        Self::with_settings(table, EngineSettings::default())
    }

    /// Create an engine with explicit settings.
    #[must_use]
    pub const fn with_settings(table: &'a DefinitionTable, settings: EngineSettings) -> Self {
        Self { table, settings }
    }

    /// Definition table in use.
    #[must_use]
    pub const fn table(&self) -> &'a DefinitionTable {
        self.table
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Check that `skill` and its cooldown group are both defined.
    pub fn resolve_skill(&self, skill: &str) -> Result<(), EngineError> {
        if self.table.skill(skill).is_none() {
            return Err(EngineError::UnknownSkill(skill.to_owned()));
        }
        if let Some(group) = self.table.unresolved_group(skill) {
            return Err(EngineError::UnknownGroup {
                skill: skill.to_owned(),
                group: group.clone(),
            });
        }
        Ok(())
    }

    /// Compute the window set of a schedule.
    ///
    /// Unresolvable uses are skipped and listed in `diagnostics`. Over-consumed
    /// resources are listed in `failures`; their skills' windows are dropped or
    /// flagged according to [`NegativeChargePolicy`]. An `Err` means an
    /// internal invariant broke, never a problem with the schedule itself.
    pub fn compute_windows(&self, uses: &[ScheduledUse]) -> Result<WindowSet, EngineError> {
        let plan = build_pulses(uses, self.table);
        let replay = track_stacks(&plan);
        let raw = synthesize_windows(&replay.edges, &plan)?;
        let mut windows = resolve_cover(raw)?;

        let failures = replay.failures;
        if !failures.is_empty() {
            let affected = |w: &CooldownWindow| {
                failures
                    .iter()
                    .any(|f| f.affects(&w.skill_id, w.owner.as_deref()))
            };
            match self.settings.negative_charge {
                NegativeChargePolicy::Isolate => {
                    let before = windows.len();
                    windows.retain(|w| !affected(w));
                    tracing::warn!(
                        "isolated {} failed resource(s), dropped {} window(s)",
                        failures.len(),
                        before - windows.len()
                    );
                }
                NegativeChargePolicy::ClampAndFlag => {
                    for window in windows.iter_mut().filter(|w| affected(w)) {
                        window.degraded = true;
                    }
                }
            }
        }

        tracing::debug!(
            "computed {} windows from {} uses",
            windows.len(),
            uses.len()
        );
        Ok(WindowSet {
            windows,
            failures,
            diagnostics: plan.diagnostics,
        })
    }

    /// The window that blocks a placement of `skill` at `at`, ignoring the
    /// uses listed in `exclude`.
    ///
    /// Errors with [`EngineError::UnknownSkill`] when the skill is not defined,
    /// [`EngineError::UnknownGroup`] when its cooldown group is not, and
    /// [`EngineError::InconsistentSchedule`] when the skill is isolated by a
    /// failed resource.
    pub fn blocking_window(
        &self,
        schedule: &[ScheduledUse],
        skill: &str,
        owner: Option<&str>,
        at: TimestampMs,
        exclude: &[UseId],
    ) -> Result<Option<CooldownWindow>, EngineError> {
        self.resolve_skill(skill)?;

        let remaining: Vec<ScheduledUse> = schedule
            .iter()
            .filter(|u| !exclude.contains(&u.id))
            .cloned()
            .collect();
        let set = self.compute_windows(&remaining)?;

        if self.settings.negative_charge == NegativeChargePolicy::Isolate
            && set.failure_for(skill, owner).is_some()
        {
            return Err(EngineError::InconsistentSchedule {
                skill: skill.to_owned(),
                owner: owner.map(str::to_owned),
            });
        }
        Ok(set.window_at(skill, owner, at).cloned())
    }

    /// Whether `skill` may be placed for `owner` at `at`.
    ///
    /// Timestamps before zero are refused unless `allow_negative_start` is set.
    pub fn is_available(
        &self,
        schedule: &[ScheduledUse],
        skill: &str,
        owner: Option<&str>,
        at: TimestampMs,
        exclude: &[UseId],
    ) -> Result<bool, EngineError> {
        if at < 0 && !self.settings.allow_negative_start {
            self.resolve_skill(skill)?;
            return Ok(false);
        }
        Ok(self
            .blocking_window(schedule, skill, owner, at, exclude)?
            .is_none())
    }
}

/// Compute windows with default settings.
pub fn compute_windows(
    table: &DefinitionTable,
    uses: &[ScheduledUse],
) -> Result<WindowSet, EngineError> {
    AvailabilityEngine::new(table).compute_windows(uses)
}
