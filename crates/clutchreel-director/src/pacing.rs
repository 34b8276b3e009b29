// crates/clutchreel-director/src/pacing.rs
//
// Phase 5 — pacing reorder and Phase 6 — hook derivation. Reordering is the
// final emitted clip order; nothing downstream reorders again.

use std::collections::VecDeque;

use clutchreel_core::{ActionIntensity, Clip};

const HOOK_LENGTH_SECS: f64 = 3.0;
const MAX_TRAILING_LOW: usize = 2;

/// Partition by action intensity into high-energy / medium / low, then
/// interleave high and medium starting with high, appending up to two
/// low-intensity clips at the end. Stable within each group.
pub fn pacing_reorder(clips: Vec<Clip>) -> Vec<Clip> {
    let mut high = VecDeque::new();
    let mut medium = VecDeque::new();
    let mut low = VecDeque::new();

    for clip in clips {
        match clip.action_intensity {
            ActionIntensity::High | ActionIntensity::VeryHigh => high.push_back(clip),
            ActionIntensity::Medium => medium.push_back(clip),
            ActionIntensity::Low => low.push_back(clip),
        }
    }

    let mut ordered = Vec::new();
    loop {
        let mut pushed = false;
        if let Some(h) = high.pop_front() {
            ordered.push(h);
            pushed = true;
        }
        if let Some(m) = medium.pop_front() {
            ordered.push(m);
            pushed = true;
        }
        if !pushed {
            break;
        }
    }
    ordered.extend(low.into_iter().take(MAX_TRAILING_LOW));
    ordered
}

/// The highest-scored clip yields a centred hook. `None` if there are no
/// clips to choose from.
pub fn derive_hook(clips: &[Clip]) -> Option<Clip> {
    clips.iter()
        .max_by(|a, b| a.score.value().partial_cmp(&b.score.value()).unwrap())
        .map(|best| best.as_hook(HOOK_LENGTH_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::{ClipType, QualityScore, TimeRange};

    fn clip(intensity: ActionIntensity, score: f64) -> Clip {
        Clip::new(TimeRange::new(0.0, 5.0), ClipType::Generic, "", "", 5, QualityScore::new(score), intensity)
    }

    #[test]
    fn scenario_s5_pacing_reorder() {
        let clips = vec![
            clip(ActionIntensity::High, 90.0),
            clip(ActionIntensity::High, 85.0),
            clip(ActionIntensity::Medium, 80.0),
            clip(ActionIntensity::Medium, 75.0),
            clip(ActionIntensity::Low, 50.0),
        ];
        let ordered = pacing_reorder(clips);
        let intensities: Vec<ActionIntensity> = ordered.iter().map(|c| c.action_intensity).collect();
        assert_eq!(intensities, vec![
            ActionIntensity::High, ActionIntensity::Medium,
            ActionIntensity::High, ActionIntensity::Medium,
            ActionIntensity::Low,
        ]);
    }

    #[test]
    fn at_most_two_trailing_low_clips_survive() {
        let clips = vec![clip(ActionIntensity::Low, 10.0); 5];
        let ordered = pacing_reorder(clips);
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn hook_is_derived_from_the_highest_scored_clip() {
        let clips = vec![clip(ActionIntensity::Low, 10.0), clip(ActionIntensity::High, 95.0)];
        let hook = derive_hook(&clips).unwrap();
        assert!(hook.is_hook());
    }

    #[test]
    fn no_hook_for_an_empty_clip_set() {
        assert!(derive_hook(&[]).is_none());
    }
}
