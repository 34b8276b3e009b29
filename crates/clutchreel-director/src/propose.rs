// crates/clutchreel-director/src/propose.rs
//
// Phase 3 — highlight proposal. Seeds one candidate `Clip` per detected
// event, then folds overlapping seeds into a non-overlapping set, the
// higher-priority seed winning each merge and absorbing the loser's range.

use clutchreel_core::{ActionIntensity, Clip, ClipType, FrameAnalysis, QualityScore, TimeRange};

use crate::events::{ClutchMoment, MultiKillEvent};

pub fn seed_clips(
    multi_kills: &[MultiKillEvent],
    clutch_moments: &[ClutchMoment],
    analyses: &[FrameAnalysis],
) -> Vec<Clip> {
    let mut seeds = Vec::new();

    for event in multi_kills {
        let range = TimeRange::new((event.timestamp - 3.0).max(0.0), event.end_timestamp + 3.0);
        seeds.push(Clip::new(
            range, ClipType::MultiKill, "", "multi-kill event",
            10, QualityScore::new(90.0), ActionIntensity::High,
        ));
    }

    for moment in clutch_moments {
        let range = TimeRange::new((moment.timestamp - 5.0).max(0.0), moment.timestamp + 5.0);
        seeds.push(Clip::new(
            range, ClipType::Clutch, "", "clutch moment",
            9, QualityScore::new(80.0), ActionIntensity::High,
        ));
    }

    for a in analyses {
        if a.excitement_score >= 25.0 {
            let range = TimeRange::new((a.timestamp - 2.0).max(0.0), a.timestamp + 3.0);
            seeds.push(Clip::new(
                range, ClipType::HighExcitement, "", "high-excitement frame",
                7, QualityScore::new(70.0), a.action_intensity,
            ));
        }
    }

    merge_overlapping(seeds)
}

/// Fold pairwise by start order: an overlapping (or touching) seed is
/// absorbed into the running clip, the higher-priority one winning the
/// surviving identity and the range extending to cover both.
fn merge_overlapping(mut seeds: Vec<Clip>) -> Vec<Clip> {
    seeds.sort_by(|a, b| a.time_range.start.partial_cmp(&b.time_range.start).unwrap());

    let mut merged: Vec<Clip> = Vec::new();
    for seed in seeds.drain(..) {
        match merged.last_mut() {
            Some(last) if seed.time_range.start <= last.time_range.end => {
                let winner = if seed.priority > last.priority { seed.clone() } else { last.clone() };
                let start = last.time_range.start.min(seed.time_range.start);
                let end = last.time_range.end.max(seed.time_range.end);
                *last = Clip { time_range: TimeRange::new(start, end), ..winner };
            }
            _ => merged.push(seed),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::TimeRange;

    fn clip(start: f64, end: f64, priority: u8) -> Clip {
        Clip::new(TimeRange::new(start, end), ClipType::Generic, "", "", priority, QualityScore::new(50.0), ActionIntensity::Medium)
    }

    #[test]
    fn scenario_s3_merge_tie_break() {
        let a = clip(10.0, 18.0, 7);
        let b = clip(15.0, 25.0, 10);
        let merged = merge_overlapping(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].time_range.start, 10.0);
        assert_eq!(merged[0].time_range.end, 25.0);
        assert_eq!(merged[0].priority, 10);
    }

    #[test]
    fn non_overlapping_seeds_survive_independently() {
        let a = clip(0.0, 5.0, 5);
        let b = clip(100.0, 105.0, 5);
        let merged = merge_overlapping(vec![a, b]);
        assert_eq!(merged.len(), 2);
    }
}
