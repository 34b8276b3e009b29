// crates/clutchreel-core/src/progress.rs
//
// Progress modeled as a tagged variant per component (design notes §9),
// plus the single projection into the unified 0-100 `ProgressEvent` the
// orchestrator emits to the outside world (§6.2).

use serde::{Deserialize, Serialize};

/// Per-component progress, as reported by the stage that's currently running.
/// The orchestrator is the only thing that ever sees all four variants; each
/// component only ever constructs its own.
///
/// `Assembling` carries its own already-weighted percent rather than a
/// `current`/`total` pair: the assembler's three internal phases (extraction,
/// concat, finalise) don't share one unit of work, so the 0-80/80-95/95-100
/// sub-bands from spec.md §4.4 are computed at the call site instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    Sampling { current: u32, total: u32 },
    Analyzing { current: usize, total: usize },
    Directing { percent: u8 },
    Assembling { percent: u8 },
}

impl Progress {
    /// Inner percent within the component's own 0-100 range, independent of
    /// the outer band the orchestrator maps it into.
    pub fn inner_percent(&self) -> u8 {
        match *self {
            Progress::Sampling { current, total } => ratio_percent(current as u64, total as u64),
            Progress::Analyzing { current, total } => ratio_percent(current as u64, total as u64),
            Progress::Directing { percent } => percent,
            Progress::Assembling { percent } => percent,
        }
    }
}

fn ratio_percent(current: u64, total: u64) -> u8 {
    if total == 0 { return 100; }
    // round(100 * current / total) via integer arithmetic: add half a
    // denominator before the floor division instead of truncating.
    (((100 * current * 2 + total) / (total * 2)).min(100)) as u8
}

/// Stage label as it appears on the wire (§6.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageLabel {
    FrameExtraction,
    AiAnalysis,
    ClipDetection,
    VideoGeneration,
    Completed,
}

impl StageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageLabel::FrameExtraction => "frame_extraction",
            StageLabel::AiAnalysis => "ai_analysis",
            StageLabel::ClipDetection => "clip_detection",
            StageLabel::VideoGeneration => "video_generation",
            StageLabel::Completed => "completed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Progress,
    Error,
    Completion,
}

/// The unified progress event schema callers observe (§6.2).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: EventKind,
    pub stage: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn progress(stage: StageLabel, percent: u8, message: Option<String>) -> Self {
        Self {
            event_type: EventKind::Progress,
            stage: stage.as_str().to_string(),
            progress: percent.min(100),
            message,
            error: None,
        }
    }

    pub fn completion(stats_summary: impl Into<String>) -> Self {
        Self {
            event_type: EventKind::Completion,
            stage: StageLabel::Completed.as_str().to_string(),
            progress: 100,
            message: Some(stats_summary.into()),
            error: None,
        }
    }

    pub fn error(stage: StageLabel, message: impl Into<String>) -> Self {
        Self {
            event_type: EventKind::Error,
            stage: stage.as_str().to_string(),
            progress: 0,
            message: None,
            error: Some(message.into()),
        }
    }
}

/// Fixed progress bands each stage's inner percent is linearly mapped into
/// (§4.5). `(lo, hi)` in whole percentage points.
pub const BAND_SAMPLING: (u8, u8) = (0, 25);
pub const BAND_ANALYZING: (u8, u8) = (25, 60);
pub const BAND_DIRECTING: (u8, u8) = (60, 75);
pub const BAND_ASSEMBLING: (u8, u8) = (75, 100);

/// Linearly project `inner` (0-100, the stage's own percent) into `(lo, hi)`.
pub fn project_band(inner: u8, band: (u8, u8)) -> u8 {
    let (lo, hi) = band;
    let span = (hi - lo) as u32;
    (lo as u32 + (span * inner.min(100) as u32) / 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_percent_rounds_to_nearest() {
        assert_eq!(ratio_percent(1, 3), 33);
        assert_eq!(ratio_percent(2, 3), 67);
        assert_eq!(ratio_percent(3, 3), 100);
        assert_eq!(ratio_percent(0, 0), 100);
    }

    #[test]
    fn project_band_endpoints() {
        assert_eq!(project_band(0, BAND_ANALYZING), 25);
        assert_eq!(project_band(100, BAND_ANALYZING), 60);
    }

    #[test]
    fn project_band_midpoint() {
        assert_eq!(project_band(50, BAND_SAMPLING), 12);
    }
}
