// crates/clutchreel-director/src/scoring.rs
//
// Phase 1 — excitement scoring. Additive point system over each analysis's
// observed facts, scaled by confidence only when confidence is known
// (`0` means "the model declined to estimate", not "zero confidence" —
// multiplying by zero would erase a frame that may well be exciting).

use clutchreel_core::{ActionIntensity, FrameAnalysis, MatchStatus};

pub fn score_all(analyses: &mut [FrameAnalysis]) {
    for a in analyses.iter_mut() {
        a.excitement_score = excitement(a);
    }
}

fn excitement(a: &FrameAnalysis) -> f64 {
    let mut total = 0.0;

    if a.kill_log {
        total += 25.0;
    }
    if a.kill_count >= 3 {
        total += 15.0;
    } else if a.kill_count >= 2 {
        total += 8.0;
    }

    total += match a.action_intensity {
        ActionIntensity::VeryHigh => 25.0,
        ActionIntensity::High => 18.0,
        ActionIntensity::Medium => 10.0,
        ActionIntensity::Low => 0.0,
    };

    total += match a.match_status {
        MatchStatus::Victory => 10.0,
        MatchStatus::Clutch => 20.0,
        MatchStatus::Overtime => 12.0,
        MatchStatus::Defeat => -5.0,
        MatchStatus::Normal | MatchStatus::Unknown => 0.0,
    };

    if a.enemy_visible {
        total += 10.0;
    }
    if a.enemy_count >= 3 {
        total += 5.0;
    }

    if a.confidence > 0.0 {
        total *= 0.5 + 0.5 * a.confidence;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn analysis() -> FrameAnalysis {
        FrameAnalysis {
            timestamp: 0.0,
            kill_log: true,
            kill_count: 3,
            match_status: MatchStatus::Clutch,
            action_intensity: ActionIntensity::High,
            enemy_visible: true,
            enemy_count: 3,
            visual_quality: clutchreel_core::VisualQuality::Normal,
            scene_description: String::new(),
            ui_elements: String::new(),
            confidence: 1.0,
            excitement_score: 0.0,
            model_used: "m".to_string(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn scenario_s1_excitement_scoring() {
        let mut a = analysis();
        score_all(std::slice::from_mut(&mut a));
        assert!((a.excitement_score - 93.0).abs() < 1e-9);
    }

    #[test]
    fn zero_confidence_is_not_multiplied() {
        let mut a = analysis();
        a.confidence = 0.0;
        let pre_multiplication = 93.0;
        score_all(std::slice::from_mut(&mut a));
        assert!((a.excitement_score - pre_multiplication).abs() < 1e-9);
    }
}
