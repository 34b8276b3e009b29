// crates/clutchreel-director/src/director.rs
//
// Ties every phase together into the single pure entry point the
// orchestrator calls once per run. Sentinel-failed frames never reach any
// phase — they carry no usable signal and are excluded up front.

use clutchreel_core::{Clip, DirectorConfig, FrameAnalysis};

use crate::compose::{compose, trim_to_target};
use crate::events::{clutch_moments, momentum_shifts, multi_kill_events, ClutchMoment, MomentumShift, MultiKillEvent};
use crate::metrics::{engagement_curve, suggestions, variety_analysis, EngagementCurve, VarietyAnalysis};
use crate::pacing::{derive_hook, pacing_reorder};
use crate::propose::seed_clips;
use crate::scoring::score_all;

pub struct DirectResult {
    pub clips: Vec<Clip>,
    pub hook_clip: Option<Clip>,
    pub engagement_curve: EngagementCurve,
    pub variety_analysis: VarietyAnalysis,
    pub suggestions: Vec<String>,
    pub multi_events: Vec<MultiKillEvent>,
    pub clutch_moments: Vec<ClutchMoment>,
    pub momentum_shifts: Vec<MomentumShift>,
}

/// Consume frame analyses and emit an ordered set of clip intervals plus a
/// hook. Pure: identical input always produces identical output (stable
/// sorts throughout).
pub fn direct(analyses: &[FrameAnalysis], config: &DirectorConfig) -> DirectResult {
    let mut valid: Vec<FrameAnalysis> = analyses.iter()
        .filter(|a| !a.is_sentinel_failed())
        .cloned()
        .collect();
    score_all(&mut valid);

    let multi_events = multi_kill_events(&valid);
    let clutches = clutch_moments(&valid);
    let shifts = momentum_shifts(&valid);

    let seeds = seed_clips(&multi_events, &clutches, &valid);
    let composed = compose(seeds, &valid, config.min_clip_length, config.max_clip_length);
    let trimmed = trim_to_target(composed, config.target_duration, config.min_clip_length);

    let hook_clip = derive_hook(&trimmed);
    let clips = pacing_reorder(trimmed);

    let curve = engagement_curve(&clips, config.optimal_pace());
    let variety = variety_analysis(&clips);
    let advice = suggestions(&clips, curve.total_duration, &variety);

    DirectResult {
        clips,
        hook_clip,
        engagement_curve: curve,
        variety_analysis: variety,
        suggestions: advice,
        multi_events,
        clutch_moments: clutches,
        momentum_shifts: shifts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::{ActionIntensity, MatchStatus, VisualQuality};
    use std::collections::BTreeMap;

    fn analysis(ts: f64, kill_log: bool, kill_count: u32, status: MatchStatus, intensity: ActionIntensity) -> FrameAnalysis {
        FrameAnalysis {
            timestamp: ts,
            kill_log,
            kill_count,
            match_status: status,
            action_intensity: intensity,
            enemy_visible: kill_log,
            enemy_count: if kill_log { 2 } else { 0 },
            visual_quality: VisualQuality::Normal,
            scene_description: String::new(),
            ui_elements: String::new(),
            confidence: 1.0,
            excitement_score: 0.0,
            model_used: "m".to_string(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn same_input_produces_identical_output() {
        let analyses = vec![
            analysis(10.0, true, 3, MatchStatus::Clutch, ActionIntensity::High),
            analysis(40.0, false, 0, MatchStatus::Normal, ActionIntensity::Low),
        ];
        let config = DirectorConfig::default();
        let first = direct(&analyses, &config);
        let second = direct(&analyses, &config);
        assert_eq!(first.clips.len(), second.clips.len());
        for (a, b) in first.clips.iter().zip(second.clips.iter()) {
            assert_eq!(a.time_range.start, b.time_range.start);
            assert_eq!(a.time_range.end, b.time_range.end);
        }
    }

    #[test]
    fn sentinel_failed_frames_are_excluded_before_any_phase_runs() {
        let mut analyses = vec![analysis(10.0, true, 3, MatchStatus::Clutch, ActionIntensity::High)];
        analyses.push(FrameAnalysis::sentinel_failed(99.0, "timeout"));
        let result = direct(&analyses, &DirectorConfig::default());
        assert!(!result.clips.is_empty());
    }

    #[test]
    fn empty_input_yields_no_clips_and_no_hook() {
        let result = direct(&[], &DirectorConfig::default());
        assert!(result.clips.is_empty());
        assert!(result.hook_clip.is_none());
    }
}
