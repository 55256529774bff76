//! Tests for error types

use mitigation_engine::core::{EngineError, WindowKind};

#[test]
fn test_unknown_skill_error() {
    let err = EngineError::UnknownSkill("rampart".to_string());
    assert_eq!(format!("{}", err), "unknown skill: rampart");
}

#[test]
fn test_unknown_group_error() {
    let err = EngineError::UnknownGroup {
        skill: "nascent_flash".to_string(),
        group: "bloodwhetting".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "unknown cooldown group `bloodwhetting` referenced by skill `nascent_flash`"
    );
}

#[test]
fn test_invalid_definition_error() {
    let err = EngineError::InvalidDefinition("stack must be at least 1".to_string());
    assert_eq!(format!("{}", err), "invalid definition: stack must be at least 1");
}

#[test]
fn test_malformed_interval_error() {
    let err = EngineError::MalformedInterval { start: 10, end: 10 };
    assert_eq!(format!("{}", err), "malformed interval [10, 10)");
}

#[test]
fn test_inconsistent_schedule_error() {
    let err = EngineError::InconsistentSchedule {
        skill: "oblation".to_string(),
        owner: Some("DRK#3".to_string()),
    };
    let text = format!("{}", err);
    assert!(text.contains("oblation"));
    assert!(text.contains("DRK#3"));
}

#[test]
fn test_sweep_errors_name_the_window_kind() {
    let unbalanced = EngineError::UnbalancedBoundary {
        skill: "rampart".to_string(),
        kind: WindowKind::Cooldown,
        at: 5,
    };
    assert_eq!(
        format!("{}", unbalanced),
        "unbalanced Cooldown boundary for skill `rampart` at 5"
    );

    let unclosed = EngineError::UnclosedWindow {
        skill: "rampart".to_string(),
        kind: WindowKind::Unusable,
        since: 0,
    };
    assert_eq!(
        format!("{}", unclosed),
        "Unusable window for skill `rampart` opened at 0 never closed"
    );
}
