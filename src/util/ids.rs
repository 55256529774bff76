//! Identifier and timestamp aliases used throughout the engine.

/// Identifier of a skill in the definition table.
pub type SkillId = String;

/// Identifier of a shared cooldown group.
pub type GroupId = String;

/// Identifier of a scheduled use.
pub type UseId = String;

/// Partition key for charge pools. Uses with different scopes never share charges.
pub type OwnerScope = String;

/// Timeline position in milliseconds.
///
/// Signed because backdated unusable windows may begin before the pull starts.
pub type TimestampMs = i64;

/// Convert a duration in (possibly fractional) seconds to whole milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn secs_to_ms(secs: f64) -> TimestampMs {
    (secs * 1_000.0).round() as TimestampMs
}

/// Generate a fresh identifier for a manually placed use.
#[must_use]
pub fn new_use_id() -> UseId {
    uuid::Uuid::new_v4().to_string()
}

/// Build the owner scope for an actor, e.g. `"WAR#12"`.
#[must_use]
pub fn owner_scope(job: &str, actor_id: u64) -> OwnerScope {
    format!("{job}#{actor_id}")
}
