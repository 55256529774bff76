//! Availability computation: pulses, charge replay, window synthesis, cover
//! resolution, and the queries built on top of them.

pub mod batch;
pub mod cover;
pub mod engine;
pub mod error;
pub mod pulse;
pub mod schedule;
pub mod stack_tracker;
pub mod window;
pub mod window_synth;

pub use batch::{BatchDecision, Conflict, ConflictReason};
pub use cover::{merge_spans, resolve_cover, subtract_spans, Span};
pub use engine::{compute_windows, AvailabilityEngine};
pub use error::{AppResult, EngineError};
pub use pulse::{
    build_pulses, Diagnostic, DiagnosticReason, Pulse, PulseKind, PulsePlan, ResourceKey,
    ResourceProfile,
};
pub use schedule::ScheduledUse;
pub use stack_tracker::{track_stacks, Edge, EdgeKind, ResourceFailure, StackReplay};
pub use window::{CooldownWindow, WindowKind, WindowSet};
pub use window_synth::{boundaries_from_edges, synthesize_windows, Boundary, BoundaryKind};
