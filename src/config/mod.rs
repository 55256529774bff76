//! Definition tables and engine settings.

pub mod definitions;
pub mod settings;

pub use definitions::{
    load_definitions_file, CooldownGroupDefinition, DefinitionTable, SkillDefinition,
};
pub use settings::{EngineSettings, NegativeChargePolicy};
