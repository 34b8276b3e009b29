// crates/clutchreel-director/src/events.rs
//
// Phase 2 — event extraction: multi-kill groupings, clutch moments, and
// momentum shifts. Purely derived from already-scored analyses; emits
// nothing back into them.

use clutchreel_core::{FrameAnalysis, MatchStatus};

const MULTI_KILL_WINDOW_SECS: f64 = 10.0;
const MOMENTUM_WINDOW: usize = 5;
const MOMENTUM_THRESHOLD: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiKillKind {
    Double,
    Triple,
    Quad,
    Ace,
}

impl MultiKillKind {
    fn from_count(count: usize) -> Option<Self> {
        match count {
            0 | 1 => None,
            2 => Some(MultiKillKind::Double),
            3 => Some(MultiKillKind::Triple),
            4 => Some(MultiKillKind::Quad),
            _ => Some(MultiKillKind::Ace),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MultiKillEvent {
    pub kind: MultiKillKind,
    pub timestamp: f64,
    pub end_timestamp: f64,
    pub kill_count: usize,
}

#[derive(Clone, Debug)]
pub struct ClutchMoment {
    pub timestamp: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MomentumDirection {
    Rising,
    Falling,
}

#[derive(Clone, Debug)]
pub struct MomentumShift {
    pub timestamp: f64,
    pub direction: MomentumDirection,
    pub magnitude: f64,
}

/// Sweep the sorted kill-log timestamps with a 10-second window: a run
/// of timestamps all within `window` seconds of the run's first entry forms
/// one group; any group of 2 or more is a multi-kill event.
pub fn multi_kill_events(analyses: &[FrameAnalysis]) -> Vec<MultiKillEvent> {
    let mut timestamps: Vec<f64> = analyses.iter().filter(|a| a.kill_log).map(|a| a.timestamp).collect();
    timestamps.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut events = Vec::new();
    let mut group: Vec<f64> = Vec::new();
    for ts in timestamps {
        if group.is_empty() || ts - group[0] <= MULTI_KILL_WINDOW_SECS {
            group.push(ts);
        } else {
            push_event(&mut events, &group);
            group = vec![ts];
        }
    }
    push_event(&mut events, &group);
    events
}

fn push_event(events: &mut Vec<MultiKillEvent>, group: &[f64]) {
    if let Some(kind) = MultiKillKind::from_count(group.len()) {
        events.push(MultiKillEvent {
            kind,
            timestamp: group[0],
            end_timestamp: *group.last().unwrap(),
            kill_count: group.len(),
        });
    }
}

pub fn clutch_moments(analyses: &[FrameAnalysis]) -> Vec<ClutchMoment> {
    analyses.iter()
        .filter(|a| a.match_status == MatchStatus::Clutch)
        .map(|a| ClutchMoment { timestamp: a.timestamp })
        .collect()
}

/// Slide a 5-before/5-after window over the non-zero-excitement analyses
/// (already in timestamp order); flag a shift wherever the mean jumps by
/// more than 10 points.
pub fn momentum_shifts(analyses: &[FrameAnalysis]) -> Vec<MomentumShift> {
    let active: Vec<&FrameAnalysis> = analyses.iter().filter(|a| a.excitement_score != 0.0).collect();
    let n = active.len();
    if n < MOMENTUM_WINDOW * 2 {
        return Vec::new();
    }

    let mut shifts = Vec::new();
    for i in MOMENTUM_WINDOW..n - MOMENTUM_WINDOW {
        let before = mean(&active[i - MOMENTUM_WINDOW..i]);
        let after = mean(&active[i..i + MOMENTUM_WINDOW]);
        let magnitude = (after - before).abs();
        if magnitude > MOMENTUM_THRESHOLD {
            let direction = if after > before { MomentumDirection::Rising } else { MomentumDirection::Falling };
            shifts.push(MomentumShift { timestamp: active[i].timestamp, direction, magnitude });
        }
    }
    shifts
}

fn mean(window: &[&FrameAnalysis]) -> f64 {
    window.iter().map(|a| a.excitement_score).sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn analysis(ts: f64, kill_log: bool) -> FrameAnalysis {
        FrameAnalysis {
            timestamp: ts,
            kill_log,
            kill_count: if kill_log { 1 } else { 0 },
            match_status: MatchStatus::Normal,
            action_intensity: clutchreel_core::ActionIntensity::Low,
            enemy_visible: false,
            enemy_count: 0,
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
    fn scenario_s2_multi_kill_classification() {
        let analyses: Vec<FrameAnalysis> = [10.0, 13.0, 18.0, 30.0].iter().map(|&t| analysis(t, true)).collect();
        let events = multi_kill_events(&analyses);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, MultiKillKind::Triple);
        assert_eq!(events[0].kill_count, 3);
        assert_eq!(events[0].timestamp, 10.0);
        assert_eq!(events[0].end_timestamp, 18.0);
    }

    #[test]
    fn single_kill_does_not_form_an_event() {
        let analyses = vec![analysis(5.0, true)];
        assert!(multi_kill_events(&analyses).is_empty());
    }
}
