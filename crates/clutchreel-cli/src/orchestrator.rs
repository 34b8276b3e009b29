// crates/clutchreel-cli/src/orchestrator.rs
//
// PipelineOrchestrator (C5): drives FrameSampler -> VisionClient ->
// CreativeDirector -> Assembler as one cancellable run, fanning each
// component's own progress into the fixed 0-100 bands of §4.5 and
// aggregating the final Stats record. Nothing here survives a run —
// construct a fresh orchestrator per invocation.

use std::path::Path;
use std::time::{Duration, Instant};

use clutchreel_core::progress::{project_band, BAND_ANALYZING, BAND_ASSEMBLING, BAND_DIRECTING, BAND_SAMPLING};
use clutchreel_core::{CancellationToken, Clip, PipelineConfig, PipelineError, ProgressEvent, Result, StageLabel, TimeRange};
use clutchreel_director::{EngagementCurve, VarietyAnalysis};
use clutchreel_media::{Assembler, FfmpegCliToolchain, FrameSampler, MediaBlob};
use clutchreel_vision::VisionClient;

/// Minimum surviving duration for a clip clamped against the true media
/// duration — anything shorter isn't worth keeping in the final reel.
const MIN_CLAMPED_CLIP_SECS: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct Stats {
    pub clip_count: usize,
    pub total_duration: f64,
    pub quality_score: f64,
    pub output_size: usize,
    pub processing_time: Duration,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
    pub engagement: EngagementCurve,
    pub variety_analysis: VarietyAnalysis,
}

pub struct PipelineOrchestrator {
    config: PipelineConfig,
    cancel: CancellationToken,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, cancel: CancellationToken::new() }
    }

    /// Flip the shared cancellation flag. Idempotent; safe to call from
    /// another thread while `run` is in progress.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn run(
        &self,
        path: &Path,
        credential: &str,
        endpoint_base: &str,
        mut on_progress: impl FnMut(ProgressEvent),
        mut on_log: impl FnMut(&str),
    ) -> Result<(MediaBlob, Stats)> {
        if credential.trim().is_empty() {
            return Err(PipelineError::AuthMissing);
        }

        let started = Instant::now();

        on_log("sampling frames");
        let (frames, info) = FrameSampler::sample(
            path,
            &self.config.sampler,
            |p| on_progress(ProgressEvent::progress(StageLabel::FrameExtraction, project_band(p.inner_percent(), BAND_SAMPLING), None)),
            &self.cancel,
        )?;
        if frames.is_empty() {
            return Err(PipelineError::NoFrames);
        }

        on_log(&format!("analyzing {} frames", frames.len()));
        let vision = VisionClient::new(self.config.vision.clone(), credential, endpoint_base);
        let analyses = vision.analyze_batch(
            &frames,
            |p| on_progress(ProgressEvent::progress(StageLabel::AiAnalysis, project_band(p.inner_percent(), BAND_ANALYZING), None)),
            &self.cancel,
        )?;

        let first_error = analyses.iter().find_map(|a| a.error_message().map(ToString::to_string));
        let all_failed = analyses.iter().all(|a| a.is_sentinel_failed());
        if all_failed {
            return Err(PipelineError::AllAnalysesFailed(first_error.unwrap_or_default()));
        }

        on_log("directing clips");
        on_progress(ProgressEvent::progress(StageLabel::ClipDetection, project_band(0, BAND_DIRECTING), None));
        let directed = clutchreel_director::direct(&analyses, &self.config.director);
        self.cancel.check()?;
        on_progress(ProgressEvent::progress(StageLabel::ClipDetection, project_band(100, BAND_DIRECTING), None));

        let clamped_clips = clamp_clips(&directed.clips, info.duration);
        if clamped_clips.is_empty() {
            return Err(PipelineError::NoHighlights);
        }
        let clamped_hook = directed.hook_clip.as_ref().and_then(|h| clamp_clip(h, info.duration));

        on_log("assembling reel");
        let toolchain = FfmpegCliToolchain::new().map_err(|e| PipelineError::AssemblerUnavailable(e.to_string()))?;
        let blob = Assembler::assemble(
            &toolchain,
            path,
            &clamped_clips,
            clamped_hook.as_ref(),
            |p| on_progress(ProgressEvent::progress(StageLabel::VideoGeneration, project_band(p.inner_percent(), BAND_ASSEMBLING), None)),
            &self.cancel,
        )?;

        let stats = build_stats(&clamped_clips, &blob, &directed, started.elapsed());
        on_progress(ProgressEvent::completion(format!("{} clips, {:.1}s total", stats.clip_count, stats.total_duration)));

        Ok((blob, stats))
    }
}

fn clamp_clip(clip: &Clip, media_duration: f64) -> Option<Clip> {
    let range = clip.time_range.clamp_to(media_duration)?;
    if range.duration() < MIN_CLAMPED_CLIP_SECS {
        return None;
    }
    Some(Clip { time_range: range, ..clip.clone() })
}

fn clamp_clips(clips: &[Clip], media_duration: f64) -> Vec<Clip> {
    clips.iter().filter_map(|c| clamp_clip(c, media_duration)).collect()
}

fn overall_score(avg_excitement: f64, durations: &[f64], distinct_clip_types: usize) -> f64 {
    let mean = durations.iter().sum::<f64>() / durations.len().max(1) as f64;
    let variance = durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / durations.len().max(1) as f64;
    let stdev = variance.sqrt();
    let raw = 1.5 * avg_excitement + 5.0 * stdev + (5.0 * distinct_clip_types as f64).min(15.0);
    raw.round().clamp(0.0, 100.0)
}

fn build_stats(clips: &[Clip], blob: &MediaBlob, directed: &clutchreel_director::DirectResult, processing_time: Duration) -> Stats {
    let durations: Vec<f64> = clips.iter().map(|c| c.time_range.duration()).collect();
    let total_duration: f64 = durations.iter().sum();
    let avg_excitement = directed.engagement_curve.avg_score;
    let quality_score = overall_score(avg_excitement, &durations, directed.variety_analysis.unique_types);

    let mut warnings = Vec::new();
    if clips.len() < 3 {
        warnings.push("Few highlights were found — the reel may feel thin.".to_string());
    }
    for issue in &directed.variety_analysis.issues {
        match issue.as_str() {
            "low_type_variety" => warnings.push("The reel draws from very few highlight categories.".to_string()),
            "uniform_clip_lengths" => warnings.push("Clips are all nearly the same length.".to_string()),
            _ => {}
        }
    }

    Stats {
        clip_count: clips.len(),
        total_duration,
        quality_score,
        output_size: blob.bytes.len(),
        processing_time,
        suggestions: directed.suggestions.clone(),
        warnings,
        engagement: directed.engagement_curve.clone(),
        variety_analysis: directed.variety_analysis.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clutchreel_core::{ActionIntensity, ClipType, QualityScore};

    fn clip(start: f64, end: f64) -> Clip {
        Clip::new(TimeRange::new(start, end), ClipType::Generic, "", "", 5, QualityScore::new(50.0), ActionIntensity::Medium)
    }

    #[test]
    fn clamp_drops_clips_shorter_than_half_a_second_after_clamping() {
        let clips = vec![clip(59.8, 61.0), clip(10.0, 20.0)];
        let clamped = clamp_clips(&clips, 60.0);
        assert_eq!(clamped.len(), 1);
        assert_eq!(clamped[0].time_range.start, 10.0);
    }

    #[test]
    fn clamp_truncates_tail_past_media_duration() {
        let clips = vec![clip(55.0, 65.0)];
        let clamped = clamp_clips(&clips, 60.0);
        assert_eq!(clamped[0].time_range.end, 60.0);
    }
}
