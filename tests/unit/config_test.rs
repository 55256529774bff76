//! Tests for definition tables and engine settings

use std::io::Write;

use mitigation_engine::config::{
    load_definitions_file, CooldownGroupDefinition, DefinitionTable, EngineSettings,
    NegativeChargePolicy, SkillDefinition,
};

#[test]
fn test_skill_definition_validation() {
    let valid = SkillDefinition {
        id: "rampart".to_string(),
        cooldown_secs: 90.0,
        stack: 1,
        cooldown_group: None,
    };
    assert!(valid.validate().is_ok());
    assert_eq!(valid.cooldown_ms(), 90_000);
}

#[test]
fn test_skill_definition_invalid_cooldown() {
    let invalid = SkillDefinition {
        id: "rampart".to_string(),
        cooldown_secs: -1.0,
        stack: 1,
        cooldown_group: None,
    };
    assert!(invalid.validate().is_err());

    let too_short = SkillDefinition {
        cooldown_secs: 0.0001,
        ..invalid
    };
    assert!(too_short.validate().is_err());
}

#[test]
fn test_group_definition_invalid_stack() {
    let invalid = CooldownGroupDefinition {
        id: "bloodwhetting".to_string(),
        cooldown_secs: 25.0,
        stack: 0,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_fractional_cooldown_rounds_to_ms() {
    let skill = SkillDefinition {
        id: "the_blackest_night".to_string(),
        cooldown_secs: 15.25,
        stack: 1,
        cooldown_group: None,
    };
    assert_eq!(skill.cooldown_ms(), 15_250);
}

#[test]
fn test_table_from_json() {
    let json = r#"{
        "groups": [ { "id": "heart", "cooldown_secs": 25 } ],
        "skills": [
            { "id": "heart_of_stone", "cooldown_secs": 25, "cooldown_group": "heart" },
            { "id": "aurora", "cooldown_secs": 60, "stack": 2 }
        ]
    }"#;

    let table = DefinitionTable::from_json_str(json).unwrap();
    assert_eq!(table.skill_count(), 2);
    assert_eq!(table.group_count(), 1);
    assert_eq!(table.skill("aurora").unwrap().stack, 2);
    assert_eq!(table.group_members("heart"), &["heart_of_stone".to_string()]);
}

#[test]
fn test_table_from_malformed_json() {
    let err = DefinitionTable::from_json_str("{ not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_tank_preset_loads() {
    let table = DefinitionTable::tank_preset().unwrap();
    assert!(table.skill("rampart").is_some());
    assert_eq!(table.skill("oblation").unwrap().stack, 2);
    assert_eq!(
        table.group_members("heart_of_corundum"),
        &["heart_of_corundum".to_string(), "heart_of_stone".to_string()]
    );
    assert!(table.orphan_groups().is_empty());
}

#[test]
fn test_orphan_groups_are_listed() {
    let table = DefinitionTable::from_toml_str(
        r#"
        [[groups]]
        id = "unused"
        cooldown_secs = 10.0
        "#,
    )
    .unwrap();
    assert_eq!(table.orphan_groups(), vec![&"unused".to_string()]);
}

#[test]
fn test_load_definitions_file_by_extension() {
    let dir = std::env::temp_dir().join(format!("mitigation_engine_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let toml_path = dir.join("defs.toml");
    let mut file = std::fs::File::create(&toml_path).unwrap();
    writeln!(file, "[[skills]]\nid = \"rampart\"\ncooldown_secs = 90.0").unwrap();
    let table = load_definitions_file(&toml_path).unwrap();
    assert!(table.skill("rampart").is_some());

    let json_path = dir.join("defs.json");
    std::fs::write(&json_path, r#"{ "skills": [ { "id": "reprisal", "cooldown_secs": 60 } ] }"#)
        .unwrap();
    let table = load_definitions_file(&json_path).unwrap();
    assert!(table.skill("reprisal").is_some());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_missing_file_reports_path() {
    let err = load_definitions_file("/definitely/not/here.toml").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
}

#[test]
fn test_settings_from_json() {
    let json = r#"{ "negative_charge": "clamp_and_flag", "allow_negative_start": true }"#;
    let settings = EngineSettings::from_json_str(json).unwrap();
    assert_eq!(settings.negative_charge, NegativeChargePolicy::ClampAndFlag);
    assert!(settings.allow_negative_start);
}

#[test]
fn test_settings_defaults_from_empty_json() {
    let settings = EngineSettings::from_json_str("{}").unwrap();
    assert_eq!(settings, EngineSettings::default());
}

#[test]
fn test_policy_parse_aliases() {
    assert_eq!("clamp".parse::<NegativeChargePolicy>(), Ok(NegativeChargePolicy::ClampAndFlag));
    assert_eq!(" Isolate ".parse::<NegativeChargePolicy>(), Ok(NegativeChargePolicy::Isolate));
    assert!("abort".parse::<NegativeChargePolicy>().is_err());
}
