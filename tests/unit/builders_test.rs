//! Tests for builder modules

use mitigation_engine::builders::DefinitionTableBuilder;
use mitigation_engine::config::SkillDefinition;
use mitigation_engine::core::EngineError;

#[test]
fn test_table_builder_collects_definitions() {
    let table = DefinitionTableBuilder::new()
        .skill("rampart", 90.0)
        .stacked_skill("oblation", 60.0, 2)
        .group("bloodwhetting", 25.0, 1)
        .grouped_skill("nascent_flash", 25.0, "bloodwhetting")
        .build()
        .unwrap();

    assert_eq!(table.skill_count(), 3);
    assert_eq!(table.group_count(), 1);
    assert_eq!(table.skill("oblation").unwrap().stack, 2);
    assert_eq!(
        table.skill("nascent_flash").unwrap().cooldown_group.as_deref(),
        Some("bloodwhetting")
    );
}

#[test]
fn test_table_builder_add_skill() {
    let table = DefinitionTableBuilder::new()
        .group("g", 30.0, 2)
        .add_skill(SkillDefinition {
            id: "custom".to_string(),
            cooldown_secs: 12.5,
            stack: 3,
            cooldown_group: Some("g".to_string()),
        })
        .build()
        .unwrap();
    assert_eq!(table.skill("custom").unwrap().cooldown_ms(), 12_500);
    assert_eq!(table.group("g").unwrap().stack, 2);
}

#[test]
fn test_table_builder_maps_validation_errors() {
    let err = DefinitionTableBuilder::new()
        .group("bloodwhetting", 25.0, 0)
        .build()
        .unwrap_err();
    match err {
        EngineError::InvalidDefinition(msg) => {
            assert!(msg.starts_with("config invalid:"));
            assert!(msg.contains("bloodwhetting"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_table_builder_keeps_undefined_group_reference() {
    let table = DefinitionTableBuilder::new()
        .skill("rampart", 90.0)
        .grouped_skill("nascent_flash", 25.0, "missing")
        .build()
        .unwrap();
    assert_eq!(table.skill_count(), 2);
    assert_eq!(
        table.unresolved_group("nascent_flash").map(String::as_str),
        Some("missing")
    );
}

#[test]
fn test_table_builder_rejects_duplicate_skill() {
    let result = DefinitionTableBuilder::new()
        .skill("rampart", 90.0)
        .skill("rampart", 60.0)
        .build();
    assert!(result.is_err());
}
