//! # Mitigation Engine
//!
//! Cooldown availability for a mitigation timeline planner.
//!
//! Given a table of skill and shared-cooldown-group definitions and a snapshot
//! of scheduled skill uses, the engine computes when each skill cannot be used
//! and validates new or moved placements against the rest of the schedule.
//!
//! ## Pipeline
//!
//! - **Pulse builder**: each use becomes consume/recover pulses on the skill's
//!   own charge pool and, when grouped, on its group's pool.
//! - **Stack tracker**: replays pulses per pool and reports depletion and
//!   restoration edges, plus pools the schedule over-consumes.
//! - **Window synthesizer**: turns edges into raw cooldown and unusable
//!   windows per (skill, pool) lane.
//! - **Cover resolver**: merges lanes into one non-overlapping timeline per
//!   skill, with cooldown taking precedence over unusable.
//! - **Queries**: single placements (`is_available`) and all-or-nothing
//!   batches (`check_batch`, `move_selection`).
//!
//! Every call recomputes from the snapshot it is given; the engine holds no
//! mutable state.
//!
//! ```rust
//! use mitigation_engine::builders::DefinitionTableBuilder;
//! use mitigation_engine::core::{AvailabilityEngine, ScheduledUse};
//!
//! let table = DefinitionTableBuilder::new()
//!     .skill("rampart", 90.0)
//!     .build()?;
//! let engine = AvailabilityEngine::new(&table);
//! let schedule = vec![ScheduledUse::with_id("u1", "rampart", None, 10_000)];
//!
//! assert!(!engine.is_available(&schedule, "rampart", None, 50_000, &[])?);
//! assert!(engine.is_available(&schedule, "rampart", None, 100_000, &[])?);
//! # Ok::<(), mitigation_engine::core::EngineError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Request/response models for the editing layer.
pub mod api;
/// Builders for validated engine inputs.
pub mod builders;
/// Definition tables and engine settings.
pub mod config;
/// Availability computation and placement checks.
pub mod core;
/// Shared utilities.
pub mod util;

pub use crate::builders::DefinitionTableBuilder;
pub use crate::config::{DefinitionTable, EngineSettings, NegativeChargePolicy};
pub use crate::core::{
    compute_windows, AvailabilityEngine, BatchDecision, CooldownWindow, EngineError,
    ScheduledUse, WindowKind, WindowSet,
};
