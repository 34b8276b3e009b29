// crates/clutchreel-core/src/quality_score.rs
//
// QualityScore: a clamped [0, 100] value with an optional named breakdown,
// used by the director for per-clip scores and by the orchestrator for the
// final engagement score in Stats.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// A score in `[0, 100]` with an optional `{componentName -> contribution}`
/// breakdown. Constructors clamp to the valid range — callers never see an
/// out-of-range value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    value:     f64,
    breakdown: BTreeMap<String, f64>,
}

impl QualityScore {
    pub fn new(value: f64) -> Self {
        Self { value: value.clamp(0.0, 100.0), breakdown: BTreeMap::new() }
    }

    pub fn with_breakdown(value: f64, breakdown: BTreeMap<String, f64>) -> Self {
        Self { value: value.clamp(0.0, 100.0), breakdown }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn breakdown(&self) -> &BTreeMap<String, f64> {
        &self.breakdown
    }

    /// Returns a copy with `delta` added to the score, re-clamped. The
    /// breakdown carries over unchanged — director composition re-derives it
    /// separately when a component is tracked.
    pub fn adjusted(&self, delta: f64) -> Self {
        Self { value: (self.value + delta).clamp(0.0, 100.0), breakdown: self.breakdown.clone() }
    }

    pub fn grade(&self) -> Grade {
        match self.value {
            v if v >= 90.0 => Grade::A,
            v if v >= 80.0 => Grade::B,
            v if v >= 70.0 => Grade::C,
            v if v >= 60.0 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.value >= 70.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_inputs() {
        assert_eq!(QualityScore::new(150.0).value(), 100.0);
        assert_eq!(QualityScore::new(-5.0).value(), 0.0);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(QualityScore::new(90.0).grade(), Grade::A);
        assert_eq!(QualityScore::new(89.9).grade(), Grade::B);
        assert_eq!(QualityScore::new(80.0).grade(), Grade::B);
        assert_eq!(QualityScore::new(70.0).grade(), Grade::C);
        assert_eq!(QualityScore::new(60.0).grade(), Grade::D);
        assert_eq!(QualityScore::new(59.9).grade(), Grade::F);
    }

    #[test]
    fn grade_monotonic_in_value() {
        let scores: Vec<f64> = vec![0.0, 10.0, 55.0, 65.0, 75.0, 85.0, 95.0];
        let grades: Vec<Grade> = scores.iter().map(|&v| QualityScore::new(v).grade()).collect();
        // Grade rank should be non-decreasing as the score rises (F < D < C < B < A).
        fn rank(g: Grade) -> u8 {
            match g { Grade::F => 0, Grade::D => 1, Grade::C => 2, Grade::B => 3, Grade::A => 4 }
        }
        for w in grades.windows(2) {
            assert!(rank(w[1]) >= rank(w[0]));
        }
    }

    #[test]
    fn is_acceptable_boundary() {
        assert!(QualityScore::new(70.0).is_acceptable());
        assert!(!QualityScore::new(69.9).is_acceptable());
    }
}
