// crates/clutchreel-director/src/compose.rs
//
// Phase 4 — composition. Re-scores each surviving seed against the
// analysis nearest its midpoint, resizes it into `[minClipLength,
// maxClipLength]`, then greedily admits clips (highest score first) until
// the running total reaches `targetDuration`.

use clutchreel_core::{ActionIntensity, Clip, FrameAnalysis, MatchStatus, QualityScore, TimeRange};

pub fn compose(seeds: Vec<Clip>, analyses: &[FrameAnalysis], min_len: f64, max_len: f64) -> Vec<Clip> {
    seeds.into_iter().map(|clip| rescore_and_resize(clip, analyses, min_len, max_len)).collect()
}

fn rescore_and_resize(clip: Clip, analyses: &[FrameAnalysis], min_len: f64, max_len: f64) -> Clip {
    let Some(nearest) = nearest_to(clip.time_range.midpoint(), analyses) else {
        return clip;
    };

    let duration = clip.time_range.duration();
    let mut points = 0.0;
    if nearest.kill_log {
        points += 10.0;
    }
    points += match nearest.action_intensity {
        ActionIntensity::VeryHigh => 8.0,
        ActionIntensity::High => 6.0,
        ActionIntensity::Medium => 4.0,
        ActionIntensity::Low => 2.0,
    };
    if nearest.match_status == MatchStatus::Victory {
        points += 5.0;
    }
    if nearest.match_status == MatchStatus::Clutch {
        points += 7.0;
    }
    if duration > max_len {
        points -= 2.0;
    }
    if duration < min_len {
        points -= 1.0;
    }

    let time_range = if duration > max_len {
        resize_centered(clip.time_range, max_len)
    } else if duration < min_len {
        resize_centered(clip.time_range, min_len)
    } else {
        clip.time_range
    };

    Clip {
        time_range,
        score: QualityScore::new(points),
        action_intensity: nearest.action_intensity,
        ..clip
    }
}

fn nearest_to(midpoint: f64, analyses: &[FrameAnalysis]) -> Option<&FrameAnalysis> {
    analyses.iter().min_by(|a, b| {
        (a.timestamp - midpoint).abs().partial_cmp(&(b.timestamp - midpoint).abs()).unwrap()
    })
}

fn resize_centered(range: TimeRange, new_duration: f64) -> TimeRange {
    let mid = range.midpoint();
    let half = new_duration / 2.0;
    let start = (mid - half).max(0.0);
    TimeRange::new(start, start + new_duration)
}

/// Sort by score descending and greedily admit clips until the running
/// total reaches `target_duration`. The clip that would overflow is
/// admitted as a head-slice if the remaining budget is still a usable clip
/// length, otherwise it is skipped and a smaller later candidate gets the
/// chance instead.
pub fn trim_to_target(mut clips: Vec<Clip>, target_duration: f64, min_clip_length: f64) -> Vec<Clip> {
    clips.sort_by(|a, b| b.score.value().partial_cmp(&a.score.value()).unwrap());

    let mut admitted = Vec::new();
    let mut total = 0.0;
    for clip in clips {
        if total >= target_duration {
            break;
        }
        let remaining = target_duration - total;
        let duration = clip.time_range.duration();
        if duration <= remaining {
            total += duration;
            admitted.push(clip);
        } else if remaining >= min_clip_length {
            let head = TimeRange::new(clip.time_range.start, clip.time_range.start + remaining);
            total += remaining;
            admitted.push(Clip { time_range: head, ..clip });
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::{ClipType, QualityScore};

    fn clip_with_score(duration: f64, score: f64) -> Clip {
        Clip::new(TimeRange::new(0.0, duration), ClipType::Generic, "", "", 5, QualityScore::new(score), ActionIntensity::Medium)
    }

    #[test]
    fn scenario_s4_trim_to_target() {
        let clips = vec![clip_with_score(6.0, 90.0), clip_with_score(5.0, 80.0), clip_with_score(4.0, 70.0)];
        let admitted = trim_to_target(clips, 10.0, 3.0);
        assert_eq!(admitted.len(), 2);
        assert_eq!(admitted[0].time_range.duration(), 6.0);
        assert!((admitted[1].time_range.duration() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_clip_dropped_when_remainder_below_min_length() {
        let clips = vec![clip_with_score(9.0, 90.0), clip_with_score(5.0, 80.0)];
        let admitted = trim_to_target(clips, 10.0, 3.0);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].time_range.duration(), 9.0);
    }
}
