//! Tests for request/response models

use mitigation_engine::api::{
    query_availability, submit_batch_move, AvailabilityQuery, BatchMoveRequest,
};
use mitigation_engine::builders::DefinitionTableBuilder;
use mitigation_engine::config::DefinitionTable;
use mitigation_engine::core::{AvailabilityEngine, ConflictReason, ScheduledUse};

fn table() -> DefinitionTable {
    DefinitionTableBuilder::new()
        .skill("rampart", 90.0)
        .skill("reprisal", 60.0)
        .build()
        .unwrap()
}

fn query(skill: &str, at_ms: i64) -> AvailabilityQuery {
    AvailabilityQuery {
        skill_id: skill.to_string(),
        owner: None,
        at_ms,
        exclude: Vec::new(),
    }
}

#[test]
fn test_query_reports_blocking_window() {
    let table = table();
    let engine = AvailabilityEngine::new(&table);
    let schedule = vec![ScheduledUse::with_id("u1", "rampart", None, 0)];

    let response = query_availability(&engine, &schedule, &query("rampart", 45_000)).unwrap();
    assert!(!response.available);
    assert_eq!(response.reason.as_deref(), Some("on cooldown from 0ms to 90000ms"));

    let response = query_availability(&engine, &schedule, &query("rampart", 90_000)).unwrap();
    assert!(response.available);
    assert!(response.reason.is_none());
}

#[test]
fn test_query_negative_start() {
    let table = table();
    let engine = AvailabilityEngine::new(&table);
    let response = query_availability(&engine, &[], &query("rampart", -10)).unwrap();
    assert!(!response.available);
    assert!(response.reason.is_some());
}

#[test]
fn test_query_unknown_skill_is_an_error() {
    let table = table();
    let engine = AvailabilityEngine::new(&table);
    let err = query_availability(&engine, &[], &query("nope", 0)).unwrap_err();
    assert_eq!(err, "unknown skill: nope");
}

#[test]
fn test_query_deserializes_with_defaults() {
    let q: AvailabilityQuery =
        serde_json::from_str(r#"{ "skill_id": "rampart", "at_ms": 5000 }"#).unwrap();
    assert!(q.owner.is_none());
    assert!(q.exclude.is_empty());
}

#[test]
fn test_batch_move_accepted_updates_schedule() {
    let table = table();
    let engine = AvailabilityEngine::new(&table);
    let schedule = vec![
        ScheduledUse::with_id("a", "rampart", None, 10_000),
        ScheduledUse::with_id("b", "reprisal", None, 20_000),
    ];
    let request = BatchMoveRequest {
        use_ids: vec!["a".to_string(), "b".to_string()],
        delta_ms: 5_000,
    };

    let response = submit_batch_move(&engine, &schedule, &request).unwrap();
    assert!(response.accepted);
    assert!(response.conflicts.is_empty());
    let starts: Vec<i64> = response.schedule.iter().map(|u| u.start_ms).collect();
    assert_eq!(starts, vec![15_000, 25_000]);
}

#[test]
fn test_batch_move_rejected_keeps_schedule() {
    let table = table();
    let engine = AvailabilityEngine::new(&table);
    let schedule = vec![
        ScheduledUse::with_id("a", "rampart", None, 0),
        ScheduledUse::with_id("b", "rampart", None, 120_000),
    ];
    let request = BatchMoveRequest {
        use_ids: vec!["b".to_string()],
        delta_ms: -60_000,
    };

    let response = submit_batch_move(&engine, &schedule, &request).unwrap();
    assert!(!response.accepted);
    assert_eq!(response.schedule, schedule);
    assert_eq!(response.conflicts.len(), 1);
    assert!(matches!(
        response.conflicts[0].reason,
        ConflictReason::Blocked { start_ms: 0, end_ms: 90_000, .. }
    ));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["conflicts"][0]["reason"]["type"], "blocked");
    assert_eq!(json["conflicts"][0]["reason"]["kind"], "cooldown");
}
