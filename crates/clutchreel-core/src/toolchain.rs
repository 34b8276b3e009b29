// crates/clutchreel-core/src/toolchain.rs
//
// MediaToolchain: the sandboxed filesystem + command contract the assembler
// cuts and concatenates through (§6.4, design notes §9). Abstracted as a
// trait so `clutchreel-media` can ship a real ffmpeg-CLI-backed
// implementation while tests swap in a stub that never shells out.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// One cut: extract `[start, start + duration)` from `input` into `output`
/// by stream-copy, normalising negative timestamps. Mirrors the argv shape
/// in §6.4: `-ss start -i input -t duration -c copy -avoid_negative_ts
/// make_zero -y output`.
pub struct CutSpec<'a> {
    pub input: &'a Path,
    pub start: f64,
    pub duration: f64,
    pub output: &'a Path,
}

pub trait MediaToolchain {
    /// Extract one interval by stream-copy. No re-encoding — the Non-goals
    /// in SPEC_FULL.md rule that out entirely.
    fn cut(&self, spec: &CutSpec) -> Result<()>;

    /// Concat-demux stream-copy every file named in `manifest`, in order,
    /// into `output`.
    fn concat(&self, manifest: &Path, output: &Path) -> Result<()>;

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    fn delete_file(&self, path: &Path) -> Result<()>;

    /// A fresh path inside the sandbox for an intermediate file with the
    /// given extension (no leading dot).
    fn sandbox_path(&self, name: &str, ext: &str) -> PathBuf;
}
