// crates/clutchreel-core/src/clip.rs
//
// Clip: a candidate (or final) highlight interval. Produced, merged, scored
// and reordered entirely inside `clutchreel-director`; consumed read-only by
// the assembler. The hook is just a `Clip` with `clip_type == Hook` and
// `metadata["is_hook"] == "true"` — see `Clip::as_hook`.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::frame_analysis::ActionIntensity;
use crate::quality_score::QualityScore;
use crate::time_range::TimeRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipType {
    MultiKill,
    Clutch,
    HighExcitement,
    Hook,
    Generic,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clip {
    pub id: Uuid,
    pub time_range: TimeRange,
    pub clip_type: ClipType,
    pub label: String,
    pub reason: String,
    /// 1-10, higher is more important. Used as the merge tie-break in
    /// the director's Phase 3 fold.
    pub priority: u8,
    pub score: QualityScore,
    pub action_intensity: ActionIntensity,
    pub metadata: BTreeMap<String, String>,
}

impl Clip {
    pub fn new(
        time_range: TimeRange,
        clip_type: ClipType,
        label: impl Into<String>,
        reason: impl Into<String>,
        priority: u8,
        score: QualityScore,
        action_intensity: ActionIntensity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            time_range,
            clip_type,
            label: label.into(),
            reason: reason.into(),
            priority: priority.clamp(1, 10),
            score,
            action_intensity,
            metadata: BTreeMap::new(),
        }
    }

    pub fn is_hook(&self) -> bool {
        self.metadata.get("is_hook").map(|v| v == "true").unwrap_or(false)
    }

    /// Turn a regular clip into the prepended hook variant — a centred
    /// 3-second slice around `self.time_range.midpoint()`, re-typed as `Hook`
    /// and flagged in metadata so the assembler always places it first.
    pub fn as_hook(&self, hook_len: f64) -> Clip {
        let mid = self.time_range.midpoint();
        let half = hook_len / 2.0;
        let time_range = TimeRange::new((mid - half).max(0.0), mid + half);
        let mut metadata = self.metadata.clone();
        metadata.insert("is_hook".to_string(), "true".to_string());
        Clip {
            id: Uuid::new_v4(),
            time_range,
            clip_type: ClipType::Hook,
            label: format!("HOOK: {}", self.label),
            reason: "highest-scored clip, trimmed to a cold open".to_string(),
            priority: self.priority,
            score: self.score.clone(),
            action_intensity: self.action_intensity,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: f64, end: f64, priority: u8) -> Clip {
        Clip::new(
            TimeRange::new(start, end),
            ClipType::Generic,
            "",
            "",
            priority,
            QualityScore::new(50.0),
            ActionIntensity::Medium,
        )
    }

    #[test]
    fn as_hook_is_centred_and_flagged() {
        let c = clip(10.0, 20.0, 5); // midpoint 15
        let hook = c.as_hook(3.0);
        assert!(hook.is_hook());
        assert_eq!(hook.clip_type, ClipType::Hook);
        assert!((hook.time_range.start - 13.5).abs() < 1e-9);
        assert!((hook.time_range.end - 16.5).abs() < 1e-9);
    }

    #[test]
    fn as_hook_floors_start_at_zero_for_early_clip() {
        let c = clip(0.0, 2.0, 5); // midpoint 1.0, half=1.5 -> start would be -0.5
        let hook = c.as_hook(3.0);
        assert_eq!(hook.time_range.start, 0.0);
    }

    #[test]
    fn priority_clamped_to_valid_range() {
        assert_eq!(clip(0.0, 1.0, 0).priority, 1);
        assert_eq!(clip(0.0, 1.0, 200).priority, 10);
    }
}
