// crates/clutchreel-core/src/config.rs
//
// Per-component configuration, all with the defaults named in the pipeline
// design. Grouped into one `PipelineConfig` that the CLI binary builds from
// flags/env and passes down to each component.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub interval_seconds: f64,
    pub max_frames: u32,
    pub jpeg_quality: f32,
    pub max_width: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { interval_seconds: 10.0, max_frames: 60, jpeg_quality: 0.85, max_width: 1280 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Ordered fallback list; length must be >= 1.
    pub models: Vec<String>,
    pub concurrency: usize,
    pub request_delay_ms: u64,
    pub cold_start_timeout_ms: u64,
    pub cold_start_retry_delay_ms: u64,
    pub all_models_backoff_ms: u64,
    pub initial_backoff_ms: u64,
    pub max_retries: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            models: vec!["default-vision-model".to_string()],
            concurrency: 1,
            request_delay_ms: 2_000,
            cold_start_timeout_ms: 120_000,
            cold_start_retry_delay_ms: 20_000,
            all_models_backoff_ms: 60_000,
            initial_backoff_ms: 2_000,
            max_retries: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DirectorConfig {
    pub min_clip_length: f64,
    pub max_clip_length: f64,
    pub target_duration: f64,
    pub pacing_variation: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self { min_clip_length: 3.0, max_clip_length: 15.0, target_duration: 180.0, pacing_variation: 0.5 }
    }
}

impl DirectorConfig {
    /// "optimal clip length" used by the pacing-score metric: `pacing_variation * 10`.
    pub fn optimal_pace(&self) -> f64 {
        self.pacing_variation * 10.0
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sampler: SamplerConfig,
    pub vision: VisionConfig,
    pub director: DirectorConfig,
}
