//! Skill and cooldown-group definitions.
//!
//! The table is immutable once built: every constructor validates it and
//! indexes group membership, and the engine only ever borrows it.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::util::{secs_to_ms, GroupId, SkillId, TimestampMs};

const TANK_PRESET: &str = include_str!("../../data/definitions/tanks.toml");

const fn default_stack() -> u32 {
    1
}

/// Cooldown definition of a single skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Skill identifier.
    pub id: SkillId,
    /// Recharge time of one charge, in seconds.
    pub cooldown_secs: f64,
    /// Maximum charges held.
    #[serde(default = "default_stack")]
    pub stack: u32,
    /// Shared cooldown group consumed alongside the skill's own charges.
    #[serde(default)]
    pub cooldown_group: Option<GroupId>,
}

/// Shared charge pool consumed by every member skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownGroupDefinition {
    /// Group identifier.
    pub id: GroupId,
    /// Recharge time of one shared charge, in seconds.
    pub cooldown_secs: f64,
    /// Maximum shared charges held.
    #[serde(default = "default_stack")]
    pub stack: u32,
}

fn validate_pool(id: &str, cooldown_secs: f64, stack: u32) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("id must not be empty".into());
    }
    if !cooldown_secs.is_finite() || cooldown_secs <= 0.0 {
        return Err(format!("cooldown_secs must be positive, got {cooldown_secs}"));
    }
    if secs_to_ms(cooldown_secs) == 0 {
        return Err("cooldown_secs rounds to zero milliseconds".into());
    }
    if stack == 0 {
        return Err("stack must be at least 1".into());
    }
    Ok(())
}

impl SkillDefinition {
    /// Validate definition values.
    pub fn validate(&self) -> Result<(), String> {
        validate_pool(&self.id, self.cooldown_secs, self.stack)
    }

    /// Recharge time in milliseconds.
    #[must_use]
    pub fn cooldown_ms(&self) -> TimestampMs {
        secs_to_ms(self.cooldown_secs)
    }
}

impl CooldownGroupDefinition {
    /// Validate definition values.
    pub fn validate(&self) -> Result<(), String> {
        validate_pool(&self.id, self.cooldown_secs, self.stack)
    }

    /// Recharge time in milliseconds.
    #[must_use]
    pub fn cooldown_ms(&self) -> TimestampMs {
        secs_to_ms(self.cooldown_secs)
    }
}

/// On-disk layout shared by the JSON and TOML loaders.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    skills: Vec<SkillDefinition>,
    #[serde(default)]
    groups: Vec<CooldownGroupDefinition>,
}

/// Read-only lookup of skill and group definitions.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    skills: HashMap<SkillId, SkillDefinition>,
    groups: HashMap<GroupId, CooldownGroupDefinition>,
    /// Group id -> member skill ids, sorted.
    members: HashMap<GroupId, Vec<SkillId>>,
}

impl DefinitionTable {
    /// Build and validate a table from definition lists.
    ///
    /// A skill naming a group that is not defined is kept; see
    /// [`DefinitionTable::unresolved_group`].
    pub fn from_parts(
        skills: Vec<SkillDefinition>,
        groups: Vec<CooldownGroupDefinition>,
    ) -> Result<Self, String> {
        let mut table = Self::default();

        for group in groups {
            group
                .validate()
                .map_err(|e| format!("group `{}` invalid: {e}", group.id))?;
            if table.groups.contains_key(&group.id) {
                return Err(format!("duplicate group `{}`", group.id));
            }
            table.groups.insert(group.id.clone(), group);
        }

        for skill in skills {
            skill
                .validate()
                .map_err(|e| format!("skill `{}` invalid: {e}", skill.id))?;
            if table.skills.contains_key(&skill.id) {
                return Err(format!("duplicate skill `{}`", skill.id));
            }
            if let Some(group) = &skill.cooldown_group {
                if table.groups.contains_key(group) {
                    table
                        .members
                        .entry(group.clone())
                        .or_default()
                        .push(skill.id.clone());
                } else {
                    // Left unindexed; uses of this skill are diagnosed per use.
                    tracing::warn!(
                        "skill `{}` references unknown group `{group}`",
                        skill.id
                    );
                }
            }
            table.skills.insert(skill.id.clone(), skill);
        }

        for members in table.members.values_mut() {
            members.sort();
        }
        Ok(table)
    }

    /// Parse a table from a JSON document and validate it.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let file: DefinitionFile =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        Self::from_parts(file.skills, file.groups)
    }

    /// Parse a table from a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        let file: DefinitionFile =
            toml::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        Self::from_parts(file.skills, file.groups)
    }

    /// Bundled tank mitigation preset.
    pub fn tank_preset() -> Result<Self, String> {
        Self::from_toml_str(TANK_PRESET)
    }

    /// Serialize the table back to JSON, skills and groups sorted by id.
    pub fn to_json_string(&self) -> Result<String, String> {
        let mut skills: Vec<SkillDefinition> = self.skills.values().cloned().collect();
        skills.sort_by(|a, b| a.id.cmp(&b.id));
        let mut groups: Vec<CooldownGroupDefinition> = self.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        serde_json::to_string_pretty(&DefinitionFile { skills, groups })
            .map_err(|e| format!("serialize error: {e}"))
    }

    /// Look up a skill definition.
    #[must_use]
    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    /// Look up a cooldown group definition.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&CooldownGroupDefinition> {
        self.groups.get(id)
    }

    /// The group `skill` names when that group is not defined.
    #[must_use]
    pub fn unresolved_group(&self, skill: &str) -> Option<&GroupId> {
        self.skills
            .get(skill)?
            .cooldown_group
            .as_ref()
            .filter(|group| !self.groups.contains_key(*group))
    }

    /// Skills naming an undefined group, with that group, sorted by skill id.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<(&SkillId, &GroupId)> {
        let mut dangling: Vec<(&SkillId, &GroupId)> = self
            .skills
            .keys()
            .filter_map(|id| self.unresolved_group(id).map(|group| (id, group)))
            .collect();
        dangling.sort();
        dangling
    }

    /// Skills sharing the given group, sorted by id.
    #[must_use]
    pub fn group_members(&self, id: &str) -> &[SkillId] {
        self.members.get(id).map_or(&[], Vec::as_slice)
    }

    /// Number of skill definitions.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Number of group definitions.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups that no skill references.
    #[must_use]
    pub fn orphan_groups(&self) -> Vec<&GroupId> {
        let referenced: HashSet<&GroupId> = self.members.keys().collect();
        let mut orphans: Vec<&GroupId> = self
            .groups
            .keys()
            .filter(|id| !referenced.contains(id))
            .collect();
        orphans.sort();
        orphans
    }
}

/// Load a definition table from a `.json` or `.toml` file.
pub fn load_definitions_file(path: impl AsRef<Path>) -> AppResult<DefinitionTable> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading definitions from {}", path.display()))?;
    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => DefinitionTable::from_toml_str(&raw),
        _ => DefinitionTable::from_json_str(&raw),
    };
    let table = parsed
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("loading definitions from {}", path.display()))?;
    let orphans = table.orphan_groups();
    if !orphans.is_empty() {
        tracing::warn!(
            "definition file {} declares unused groups: {:?}",
            path.display(),
            orphans
        );
    }
    let dangling = table.unresolved_references();
    if !dangling.is_empty() {
        tracing::warn!(
            "definition file {} names undefined groups: {:?}",
            path.display(),
            dangling
        );
    }
    tracing::info!(
        "loaded {} skills and {} groups from {}",
        table.skill_count(),
        table.group_count(),
        path.display()
    );
    Ok(table)
}
