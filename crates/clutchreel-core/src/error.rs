// crates/clutchreel-core/src/error.rs
//
// Unified error enumeration for the highlight pipeline (§7 of the design).
// Every variant here is fatal and terminates the run — recoverable per-frame
// vision failures never reach this type, they're folded into a sentinel
// `FrameAnalysis` instead (see `clutchreel_core::frame_analysis`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// No vision-API credential was supplied before the run started.
    #[error("credential not set")]
    AuthMissing,

    /// The vision API rejected the credential (HTTP 401). Non-retryable,
    /// non-rotating — fails the whole run immediately.
    #[error("invalid credential")]
    AuthInvalid,

    /// The source file's duration could not be determined.
    #[error("cannot read video: duration unavailable")]
    MediaMetadataUnavailable,

    /// A seek during frame sampling never resolved within the allotted bound.
    #[error("seek failed at {0:.3}s")]
    SeekFailed(f64),

    /// Frame sampling produced zero frames.
    #[error("no frames extractable from source media")]
    NoFrames,

    /// Every frame's vision analysis failed; `0` carries the first error text.
    #[error("all frame analyses failed: {0}")]
    AllAnalysesFailed(String),

    /// The director produced zero clips after clamping to media duration.
    #[error("no highlights detected")]
    NoHighlights,

    /// The media toolchain (ffmpeg) could not be located/launched.
    #[error("toolchain load failed: {0}")]
    AssemblerUnavailable(String),

    /// A cut or concat invocation exited non-zero.
    #[error("assembly failed: {0}")]
    AssemblyFailed(String),

    /// The run was cancelled by the caller. Terminal, silent — callers should
    /// treat this as "no error to report", just an early stop.
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
