//! Tests for utility functions

use mitigation_engine::util::{init_tracing, init_tracing_with, new_use_id, owner_scope, secs_to_ms};

#[test]
fn test_secs_to_ms_rounds() {
    assert_eq!(secs_to_ms(90.0), 90_000);
    assert_eq!(secs_to_ms(2.5), 2_500);
    assert_eq!(secs_to_ms(0.0004), 0);
}

#[test]
fn test_new_use_ids_are_unique_uuids() {
    let a = new_use_id();
    let b = new_use_id();
    assert_ne!(a, b);
    assert!(uuid::Uuid::parse_str(&a).is_ok());
}

#[test]
fn test_owner_scope_format() {
    assert_eq!(owner_scope("WAR", 12), "WAR#12");
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    init_tracing_with("mitigation_engine=debug");
}
