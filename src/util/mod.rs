//! Shared identifiers, time helpers, and telemetry.

pub mod ids;
pub mod telemetry;

pub use ids::*;
pub use telemetry::*;
