// crates/clutchreel-director/src/metrics.rs
//
// Derived metrics computed once over the final clip set: an engagement
// curve, a variety analysis flagging monotony, and threshold-driven
// suggestions surfaced to the end user.

use clutchreel_core::{Clip, ClipType};

#[derive(Clone, Debug)]
pub struct EngagementCurve {
    pub avg_score: f64,
    pub score_variance: f64,
    pub peak_index: usize,
    pub total_duration: f64,
    pub clip_count: usize,
    pub pacing_score: f64,
}

#[derive(Clone, Debug)]
pub struct VarietyAnalysis {
    pub variety_score: f64,
    pub unique_types: usize,
    pub duration_variance: f64,
    pub issues: Vec<String>,
}

pub fn engagement_curve(clips: &[Clip], optimal_pace: f64) -> EngagementCurve {
    if clips.is_empty() {
        return EngagementCurve { avg_score: 0.0, score_variance: 0.0, peak_index: 0, total_duration: 0.0, clip_count: 0, pacing_score: 0.0 };
    }

    let scores: Vec<f64> = clips.iter().map(|c| c.score.value()).collect();
    let avg_score = mean(&scores);
    let score_variance = variance(&scores, avg_score);
    let peak_index = scores.iter().enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);

    let durations: Vec<f64> = clips.iter().map(|c| c.time_range.duration()).collect();
    let total_duration = durations.iter().sum();
    let avg_duration = mean(&durations);
    let pacing_score = (100.0 - 10.0 * (avg_duration - optimal_pace).abs()).max(0.0);

    EngagementCurve {
        avg_score,
        score_variance,
        peak_index,
        total_duration,
        clip_count: clips.len(),
        pacing_score,
    }
}

pub fn variety_analysis(clips: &[Clip]) -> VarietyAnalysis {
    if clips.is_empty() {
        return VarietyAnalysis { variety_score: 0.0, unique_types: 0, duration_variance: 0.0, issues: Vec::new() };
    }

    let mut types: Vec<ClipType> = clips.iter().map(|c| c.clip_type).collect();
    types.sort_by_key(|t| *t as u8);
    types.dedup();
    let unique_types = types.len();

    let durations: Vec<f64> = clips.iter().map(|c| c.time_range.duration()).collect();
    let duration_variance = variance(&durations, mean(&durations));

    let variety_score = (20.0 * unique_types as f64 + (5.0 * duration_variance).min(30.0)).min(100.0);

    let mut issues = Vec::new();
    if unique_types < 2 {
        issues.push("low_type_variety".to_string());
    }
    if duration_variance < 2.0 {
        issues.push("uniform_clip_lengths".to_string());
    }

    VarietyAnalysis { variety_score, unique_types, duration_variance, issues }
}

pub fn suggestions(clips: &[Clip], total_duration: f64, variety: &VarietyAnalysis) -> Vec<String> {
    let mut out = Vec::new();

    if total_duration > 300.0 {
        out.push("The reel is quite long — consider a tighter target duration.".to_string());
    }
    if clips.len() > 15 {
        out.push("A large number of clips were selected; the reel may feel choppy.".to_string());
    }
    if total_duration < 30.0 {
        out.push("The reel is very short; look for a longer source clip or lower the excitement threshold.".to_string());
    }

    let below_30 = clips.iter().filter(|c| c.score.value() < 30.0).count();
    if clips.len() > 0 && below_30 as f64 / clips.len() as f64 > 0.3 {
        out.push("Over 30% of clips scored below 30 — source footage may lack standout moments.".to_string());
    }

    if variety.unique_types < 2 && clips.len() >= 4 {
        out.push("Clips are all the same type; the reel may feel repetitive.".to_string());
    }

    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}

fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() { 0.0 } else {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::{ActionIntensity, QualityScore, TimeRange};

    fn clip(ty: ClipType, duration: f64, score: f64) -> Clip {
        Clip::new(TimeRange::new(0.0, duration), ty, "", "", 5, QualityScore::new(score), ActionIntensity::Medium)
    }

    #[test]
    fn variety_flags_low_type_count_and_uniform_lengths() {
        let clips = vec![clip(ClipType::Generic, 5.0, 50.0), clip(ClipType::Generic, 5.0, 50.0)];
        let v = variety_analysis(&clips);
        assert!(v.issues.contains(&"low_type_variety".to_string()));
        assert!(v.issues.contains(&"uniform_clip_lengths".to_string()));
    }

    #[test]
    fn empty_clip_set_yields_zeroed_metrics() {
        let curve = engagement_curve(&[], 5.0);
        assert_eq!(curve.clip_count, 0);
        assert_eq!(curve.avg_score, 0.0);
    }
}
