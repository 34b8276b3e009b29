// crates/clutchreel-core/src/lib.rs
//
// Pure data model and shared contracts for the highlight pipeline — no
// ffmpeg, no HTTP client, no CLI. Used by every other crate in the workspace.

pub mod cancel;
pub mod clip;
pub mod config;
pub mod error;
pub mod frame;
pub mod frame_analysis;
pub mod helpers;
pub mod progress;
pub mod quality_score;
pub mod time_range;
pub mod toolchain;

pub use cancel::CancellationToken;
pub use clip::{Clip, ClipType};
pub use config::{DirectorConfig, PipelineConfig, SamplerConfig, VisionConfig};
pub use error::{PipelineError, Result};
pub use frame::Frame;
pub use frame_analysis::{ActionIntensity, FrameAnalysis, FrameAnalysisRaw, MatchStatus, VisualQuality};
pub use progress::{EventKind, Progress, ProgressEvent, StageLabel};
pub use quality_score::{Grade, QualityScore};
pub use time_range::TimeRange;
pub use toolchain::{CutSpec, MediaToolchain};
