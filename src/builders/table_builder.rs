//! Fluent construction of validated definition tables.

use crate::config::{CooldownGroupDefinition, DefinitionTable, SkillDefinition};
use crate::core::EngineError;
use crate::util::GroupId;

/// Collects skill and group definitions, then validates them in one step.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTableBuilder {
    skills: Vec<SkillDefinition>,
    groups: Vec<CooldownGroupDefinition>,
}

impl DefinitionTableBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-charge, ungrouped skill.
    #[must_use]
    pub fn skill(self, id: impl Into<String>, cooldown_secs: f64) -> Self {
        self.add_skill(SkillDefinition {
            id: id.into(),
            cooldown_secs,
            stack: 1,
            cooldown_group: None,
        })
    }

    /// Add an ungrouped skill holding `stack` charges.
    #[must_use]
    pub fn stacked_skill(self, id: impl Into<String>, cooldown_secs: f64, stack: u32) -> Self {
        self.add_skill(SkillDefinition {
            id: id.into(),
            cooldown_secs,
            stack,
            cooldown_group: None,
        })
    }

    /// Add a single-charge skill that also consumes `group`.
    #[must_use]
    pub fn grouped_skill(
        self,
        id: impl Into<String>,
        cooldown_secs: f64,
        group: impl Into<GroupId>,
    ) -> Self {
        self.add_skill(SkillDefinition {
            id: id.into(),
            cooldown_secs,
            stack: 1,
            cooldown_group: Some(group.into()),
        })
    }

    /// Add a fully specified skill.
    #[must_use]
    pub fn add_skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.push(skill);
        self
    }

    /// Add a shared cooldown group.
    #[must_use]
    pub fn group(mut self, id: impl Into<GroupId>, cooldown_secs: f64, stack: u32) -> Self {
        self.groups.push(CooldownGroupDefinition {
            id: id.into(),
            cooldown_secs,
            stack,
        });
        self
    }

    /// Validate and build the table.
    pub fn build(self) -> Result<DefinitionTable, EngineError> {
        let table = DefinitionTable::from_parts(self.skills, self.groups)
            .map_err(|e| EngineError::InvalidDefinition(format!("config invalid: {e}")))?;
        tracing::debug!(
            "built definition table with {} skills and {} groups",
            table.skill_count(),
            table.group_count()
        );
        Ok(table)
    }
}
