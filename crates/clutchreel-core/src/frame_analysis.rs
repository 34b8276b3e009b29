// crates/clutchreel-core/src/frame_analysis.rs
//
// FrameAnalysis: one sampled frame's observed facts, produced by the vision
// client from one model response. `FrameAnalysisRaw` is the duck-typed wire
// shape the model actually returns; `FrameAnalysis::from_raw` is the single
// place that coerces it into the canonical, enum-validated form described
// here — unknown enum strings fall back to a safe default rather than
// failing the frame.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Normal,
    Clutch,
    Victory,
    Defeat,
    Overtime,
    Unknown,
}

impl Default for MatchStatus {
    fn default() -> Self { MatchStatus::Unknown }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntensity {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl Default for ActionIntensity {
    fn default() -> Self { ActionIntensity::Low }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualQuality {
    Cinematic,
    High,
    Normal,
    Low,
}

impl Default for VisualQuality {
    fn default() -> Self { VisualQuality::Normal }
}

/// The duck-typed shape a vision-model response is expected to contain.
/// Every field has a default so a partially-populated or sloppily-typed
/// response still coerces into a usable `FrameAnalysis` rather than failing
/// the whole frame — see `design notes §9` in SPEC_FULL.md for the rationale.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameAnalysisRaw {
    #[serde(default)]
    pub kill_log: bool,
    #[serde(default)]
    pub kill_count: i64,
    #[serde(default)]
    pub match_status: String,
    #[serde(default)]
    pub action_intensity: String,
    #[serde(default)]
    pub enemy_visible: bool,
    #[serde(default)]
    pub enemy_count: i64,
    #[serde(default)]
    pub visual_quality: String,
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub ui_elements: String,
    #[serde(default)]
    pub confidence: f64,
}

fn parse_match_status(s: &str) -> MatchStatus {
    match s {
        "normal" => MatchStatus::Normal,
        "clutch" => MatchStatus::Clutch,
        "victory" => MatchStatus::Victory,
        "defeat" => MatchStatus::Defeat,
        "overtime" => MatchStatus::Overtime,
        _ => MatchStatus::Unknown,
    }
}

fn parse_action_intensity(s: &str) -> ActionIntensity {
    match s {
        "very_high" => ActionIntensity::VeryHigh,
        "high" => ActionIntensity::High,
        "medium" => ActionIntensity::Medium,
        _ => ActionIntensity::Low,
    }
}

fn parse_visual_quality(s: &str) -> VisualQuality {
    match s {
        "cinematic" => VisualQuality::Cinematic,
        "high" => VisualQuality::High,
        "low" => VisualQuality::Low,
        _ => VisualQuality::Normal,
    }
}

/// One frame's observed facts plus provenance. `excitement_score` starts at
/// 0 and is only ever written by `clutchreel-director`'s scoring phase — this
/// crate never computes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub timestamp: f64,
    pub kill_log: bool,
    pub kill_count: u32,
    pub match_status: MatchStatus,
    pub action_intensity: ActionIntensity,
    pub enemy_visible: bool,
    pub enemy_count: u32,
    pub visual_quality: VisualQuality,
    pub scene_description: String,
    pub ui_elements: String,
    pub confidence: f64,
    pub excitement_score: f64,
    pub model_used: String,
    pub metadata: BTreeMap<String, String>,
}

impl FrameAnalysis {
    /// Coerce a duck-typed raw response into the canonical analysis.
    pub fn from_raw(raw: FrameAnalysisRaw, timestamp: f64, model_used: impl Into<String>) -> Self {
        Self {
            timestamp,
            kill_log: raw.kill_log,
            kill_count: raw.kill_count.max(0) as u32,
            match_status: parse_match_status(&raw.match_status),
            action_intensity: parse_action_intensity(&raw.action_intensity),
            enemy_visible: raw.enemy_visible,
            enemy_count: raw.enemy_count.max(0) as u32,
            visual_quality: parse_visual_quality(&raw.visual_quality),
            scene_description: raw.scene_description,
            ui_elements: raw.ui_elements,
            confidence: raw.confidence.clamp(0.0, 1.0),
            excitement_score: 0.0,
            model_used: model_used.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// A degraded analysis for a response whose JSON body couldn't be parsed
    /// at all — per §4.2, this is *not* a transport failure, so it carries no
    /// `metadata.error` and is still scored downstream.
    pub fn degraded(timestamp: f64, model_used: impl Into<String>) -> Self {
        Self {
            timestamp,
            kill_log: false,
            kill_count: 0,
            match_status: MatchStatus::Unknown,
            action_intensity: ActionIntensity::Low,
            enemy_visible: false,
            enemy_count: 0,
            visual_quality: VisualQuality::Normal,
            scene_description: String::new(),
            ui_elements: String::new(),
            confidence: 0.0,
            excitement_score: 0.0,
            model_used: model_used.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// A sentinel analysis recorded for a frame whose request failed every
    /// retry/rotation attempt. Excluded from all scoring by `is_sentinel_failed`.
    pub fn sentinel_failed(timestamp: f64, error: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("error".to_string(), error.into());
        Self {
            timestamp,
            kill_log: false,
            kill_count: 0,
            match_status: MatchStatus::Unknown,
            action_intensity: ActionIntensity::Low,
            enemy_visible: false,
            enemy_count: 0,
            visual_quality: VisualQuality::Normal,
            scene_description: String::new(),
            ui_elements: String::new(),
            confidence: 0.0,
            excitement_score: 0.0,
            model_used: String::new(),
            metadata,
        }
    }

    pub fn is_sentinel_failed(&self) -> bool {
        self.metadata.contains_key("error")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.metadata.get("error").map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enum_strings_fall_back_to_safe_defaults() {
        let raw = FrameAnalysisRaw {
            match_status: "legendary".into(),
            action_intensity: "insane".into(),
            visual_quality: "ultra".into(),
            ..Default::default()
        };
        let a = FrameAnalysis::from_raw(raw, 1.0, "test-model");
        assert_eq!(a.match_status, MatchStatus::Unknown);
        assert_eq!(a.action_intensity, ActionIntensity::Low);
        assert_eq!(a.visual_quality, VisualQuality::Normal);
    }

    #[test]
    fn sentinel_failed_is_excluded_marker() {
        let a = FrameAnalysis::sentinel_failed(5.0, "timeout");
        assert!(a.is_sentinel_failed());
        assert_eq!(a.error_message(), Some("timeout"));

        let ok = FrameAnalysis::degraded(5.0, "m1");
        assert!(!ok.is_sentinel_failed());
    }

    #[test]
    fn confidence_clamped_into_unit_interval() {
        let raw = FrameAnalysisRaw { confidence: 4.0, ..Default::default() };
        assert_eq!(FrameAnalysis::from_raw(raw, 0.0, "m").confidence, 1.0);
        let raw = FrameAnalysisRaw { confidence: -1.0, ..Default::default() };
        assert_eq!(FrameAnalysis::from_raw(raw, 0.0, "m").confidence, 0.0);
    }
}
