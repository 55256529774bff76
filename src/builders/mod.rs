//! Builders for engine inputs.

pub mod table_builder;

pub use table_builder::DefinitionTableBuilder;
