//! Cover resolution: per-lane raw windows to one clean timeline per skill.
//!
//! A skill constrained by several pools (its own charges plus a shared group)
//! gets windows from each lane. Same-kind windows that touch or overlap are
//! merged, and any part of an unusable window covered by a cooldown is removed,
//! leaving cooldown and unusable windows that never overlap.

use std::collections::BTreeMap;

use crate::core::{CooldownWindow, EngineError, WindowKind};
use crate::util::{OwnerScope, SkillId, TimestampMs};

/// Bare half-open interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start.
    pub start: TimestampMs,
    /// Exclusive end.
    pub end: TimestampMs,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: TimestampMs, end: TimestampMs) -> Self {
        Self { start, end }
    }
}

/// Merge spans sorted by start; touching spans are joined.
#[must_use]
pub fn merge_spans(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut() {
            if span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

/// Remove `cut` from `base`. Both inputs must be merged and sorted.
#[must_use]
pub fn subtract_spans(base: &[Span], cut: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut first = 0;

    for &b in base {
        let mut start = b.start;

        while first < cut.len() && cut[first].end <= start {
            first += 1;
        }

        let mut j = first;
        while j < cut.len() && cut[j].start < b.end {
            let c = cut[j];
            if c.start > start {
                result.push(Span::new(start, c.start));
            }
            start = start.max(c.end);
            j += 1;
        }

        if start < b.end {
            result.push(Span::new(start, b.end));
        }
    }

    result
}

#[derive(Default)]
struct SkillSpans {
    cooldown: Vec<Span>,
    unusable: Vec<Span>,
}

/// Combine raw lane windows into the final, sorted window list.
pub fn resolve_cover(raw: Vec<CooldownWindow>) -> Result<Vec<CooldownWindow>, EngineError> {
    let mut by_skill: BTreeMap<(SkillId, Option<OwnerScope>), SkillSpans> = BTreeMap::new();
    for window in raw {
        let span = Span::new(window.start_ms, window.end_ms);
        let spans = by_skill.entry((window.skill_id, window.owner)).or_default();
        match window.kind {
            WindowKind::Cooldown => spans.cooldown.push(span),
            WindowKind::Unusable => spans.unusable.push(span),
        }
    }

    let mut resolved = Vec::new();
    for ((skill, owner), mut spans) in by_skill {
        spans.cooldown.sort_unstable();
        spans.unusable.sort_unstable();
        let cooldown = merge_spans(&spans.cooldown);
        let unusable = subtract_spans(&merge_spans(&spans.unusable), &cooldown);

        for (kind, list) in [(WindowKind::Cooldown, cooldown), (WindowKind::Unusable, unusable)] {
            for span in list {
                resolved.push(CooldownWindow::new(
                    skill.clone(),
                    owner.clone(),
                    kind,
                    span.start,
                    span.end,
                )?);
            }
        }
    }

    resolved.sort_by(|a, b| {
        a.start_ms
            .cmp(&b.start_ms)
            .then(a.end_ms.cmp(&b.end_ms))
            .then_with(|| a.skill_id.cmp(&b.skill_id))
            .then_with(|| a.owner.cmp(&b.owner))
            .then(a.kind.cmp(&b.kind))
    });
    Ok(resolved)
}
