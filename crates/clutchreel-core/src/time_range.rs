// crates/clutchreel-core/src/time_range.rs
//
// TimeRange: the one interval type every component in the pipeline passes
// around — sampled timestamps, clip spans, the final clamp against media
// duration. Immutable by construction; every transform returns a new value.

use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` in seconds.
///
/// `start` is always `>= 0` and `end` is always `> start` — `new()` panics on
/// violation since every caller in this pipeline already guarantees it from
/// upstream invariants (see the per-phase contracts in `clutchreel-director`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end:   f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        assert!(start >= 0.0, "TimeRange start must be >= 0, got {start}");
        assert!(end > start, "TimeRange end ({end}) must be > start ({start})");
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        self.start + self.duration() / 2.0
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Merge with an overlapping range. Panics if the ranges don't overlap —
    /// callers (director's Phase 3 fold) must check `overlaps` first.
    ///
    /// ```
    /// use clutchreel_core::time_range::TimeRange;
    /// let a = TimeRange::new(10.0, 18.0);
    /// let b = TimeRange::new(15.0, 25.0);
    /// assert_eq!(a.merge(&b), TimeRange::new(10.0, 25.0));
    /// ```
    pub fn merge(&self, other: &TimeRange) -> TimeRange {
        assert!(self.overlaps(other), "merge requires overlapping ranges");
        TimeRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Extend the range by `before` seconds on the start and `after` seconds
    /// on the end. `start` is floored to 0 rather than going negative.
    ///
    /// ```
    /// use clutchreel_core::time_range::TimeRange;
    /// let r = TimeRange::new(5.0, 10.0);
    /// assert_eq!(r.extend(0.0, 0.0), r);
    /// ```
    pub fn extend(&self, before: f64, after: f64) -> TimeRange {
        assert!(before >= 0.0 && after >= 0.0, "extend() amounts must be non-negative");
        TimeRange::new((self.start - before).max(0.0), self.end + after)
    }

    /// Intersect with `[0, bound)`, the true media duration. Returns `None`
    /// if the intersection would be empty or non-positive in duration.
    pub fn clamp_to(&self, bound: f64) -> Option<TimeRange> {
        let start = self.start.max(0.0);
        let end   = self.end.min(bound);
        if end > start { Some(TimeRange::new(start, end)) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_and_midpoint() {
        let r = TimeRange::new(10.0, 16.0);
        assert_eq!(r.duration(), 6.0);
        assert_eq!(r.midpoint(), 13.0);
    }

    #[test]
    fn overlaps_half_open() {
        let a = TimeRange::new(0.0, 5.0);
        let b = TimeRange::new(5.0, 10.0);
        assert!(!a.overlaps(&b), "half-open ranges touching at the boundary don't overlap");
        let c = TimeRange::new(4.9, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn merge_self_is_identity() {
        let r = TimeRange::new(3.0, 9.0);
        assert_eq!(r.merge(&r), r);
    }

    #[test]
    fn extend_floors_start_at_zero() {
        let r = TimeRange::new(1.0, 4.0);
        let e = r.extend(5.0, 2.0);
        assert_eq!(e, TimeRange::new(0.0, 6.0));
    }

    #[test]
    fn clamp_to_drops_fully_out_of_bounds() {
        let r = TimeRange::new(100.0, 110.0);
        assert_eq!(r.clamp_to(60.0), None);
    }

    #[test]
    fn clamp_to_truncates_tail() {
        let r = TimeRange::new(55.0, 65.0);
        assert_eq!(r.clamp_to(60.0), Some(TimeRange::new(55.0, 60.0)));
    }
}
