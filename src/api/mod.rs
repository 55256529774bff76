//! Request/response models for the editing layer.

use serde::{Deserialize, Serialize};

use crate::core::{AvailabilityEngine, Conflict, EngineError, ScheduledUse, WindowKind};
use crate::util::{OwnerScope, SkillId, TimestampMs, UseId};

/// Can this skill be placed here?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Skill to place.
    pub skill_id: SkillId,
    /// Owner scope of the placement.
    #[serde(default)]
    pub owner: Option<OwnerScope>,
    /// Candidate start.
    pub at_ms: TimestampMs,
    /// Uses to ignore, typically the ones being dragged.
    #[serde(default)]
    pub exclude: Vec<UseId>,
}

/// Answer to an [`AvailabilityQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Queried skill.
    pub skill_id: SkillId,
    /// Queried owner scope.
    pub owner: Option<OwnerScope>,
    /// Queried start.
    pub at_ms: TimestampMs,
    /// Whether the placement is legal.
    pub available: bool,
    /// Why it is not.
    pub reason: Option<String>,
}

/// Move several uses by the same offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMoveRequest {
    /// Selected uses.
    pub use_ids: Vec<UseId>,
    /// Offset applied to each.
    pub delta_ms: TimestampMs,
}

/// Result of a [`BatchMoveRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMoveResponse {
    /// Whether the move was applied.
    pub accepted: bool,
    /// Conflicts that caused rejection.
    pub conflicts: Vec<Conflict>,
    /// Schedule after the request: moved if accepted, unchanged otherwise.
    pub schedule: Vec<ScheduledUse>,
}

const fn kind_label(kind: WindowKind) -> &'static str {
    match kind {
        WindowKind::Cooldown => "on cooldown",
        WindowKind::Unusable => "reserved by a later use",
    }
}

/// Answer an availability query against a schedule snapshot.
pub fn query_availability(
    engine: &AvailabilityEngine<'_>,
    schedule: &[ScheduledUse],
    query: &AvailabilityQuery,
) -> Result<AvailabilityResponse, String> {
    let mut response = AvailabilityResponse {
        skill_id: query.skill_id.clone(),
        owner: query.owner.clone(),
        at_ms: query.at_ms,
        available: false,
        reason: None,
    };

    if query.at_ms < 0 && !engine.settings().allow_negative_start {
        engine
            .resolve_skill(&query.skill_id)
            .map_err(|e| e.to_string())?;
        response.reason = Some("placement before the pull start".into());
        return Ok(response);
    }

    match engine.blocking_window(
        schedule,
        &query.skill_id,
        query.owner.as_deref(),
        query.at_ms,
        &query.exclude,
    ) {
        Ok(None) => response.available = true,
        Ok(Some(window)) => {
            response.reason = Some(format!(
                "{} from {}ms to {}ms",
                kind_label(window.kind),
                window.start_ms,
                window.end_ms
            ));
        }
        Err(e @ EngineError::InconsistentSchedule { .. }) => response.reason = Some(e.to_string()),
        Err(e) => return Err(e.to_string()),
    }
    Ok(response)
}

/// Validate and, if legal, apply a selection move.
pub fn submit_batch_move(
    engine: &AvailabilityEngine<'_>,
    schedule: &[ScheduledUse],
    request: &BatchMoveRequest,
) -> Result<BatchMoveResponse, String> {
    let decision = engine
        .move_selection(schedule, &request.use_ids, request.delta_ms)
        .map_err(|e| e.to_string())?;

    let moved = decision.apply_to(schedule);
    Ok(BatchMoveResponse {
        accepted: moved.is_some(),
        conflicts: decision.conflicts().to_vec(),
        schedule: moved.unwrap_or_else(|| schedule.to_vec()),
    })
}
