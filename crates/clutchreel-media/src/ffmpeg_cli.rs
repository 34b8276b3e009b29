// crates/clutchreel-media/src/ffmpeg_cli.rs
//
// FfmpegCliToolchain: the default `MediaToolchain` implementation. Shells
// out to the system `ffmpeg` binary for cut/concat the same way the rest of
// the pipeline shells out for audio/waveform extraction — the CLI handles
// every container/codec combination correctly with no resampler fiddling in
// this crate, and stream-copy cutting is exactly what its argv already
// supports (§6.4).

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, bail, Result};
use clutchreel_core::toolchain::{CutSpec, MediaToolchain};

pub struct FfmpegCliToolchain {
    sandbox: tempfile::TempDir,
    ffmpeg_bin: String,
}

impl FfmpegCliToolchain {
    /// Locate the ffmpeg binary and open a fresh sandbox directory.
    /// Returns an error the assembler maps to `AssemblerUnavailable`.
    pub fn new() -> Result<Self> {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(ffmpeg_bin: impl Into<String>) -> Result<Self> {
        let ffmpeg_bin = ffmpeg_bin.into();
        let check = Command::new(&ffmpeg_bin).arg("-version").output();
        match check {
            Ok(out) if out.status.success() => {}
            Ok(out) => bail!("ffmpeg -version exited {}: {}", out.status,
                String::from_utf8_lossy(&out.stderr).lines().last().unwrap_or("")),
            Err(e) => bail!("ffmpeg binary not found: {e}"),
        }
        let sandbox = tempfile::tempdir()?;
        Ok(Self { sandbox, ffmpeg_bin })
    }

    fn path_str(p: &Path) -> Result<&str> {
        p.to_str().ok_or_else(|| anyhow!("path is not valid UTF-8: {}", p.display()))
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let out = Command::new(&self.ffmpeg_bin).args(args).output()?;
        if !out.status.success() {
            let tail = String::from_utf8_lossy(&out.stderr).lines().last().unwrap_or("").to_string();
            log::warn!("ffmpeg exited {}: {tail}", out.status);
            bail!(tail);
        }
        Ok(())
    }
}

impl MediaToolchain for FfmpegCliToolchain {
    fn cut(&self, spec: &CutSpec) -> Result<()> {
        let input = Self::path_str(spec.input)?;
        let output = Self::path_str(spec.output)?;
        let start = format!("{:.3}", spec.start);
        let duration = format!("{:.3}", spec.duration);
        self.run(&[
            "-ss", &start,
            "-i", input,
            "-t", &duration,
            "-c", "copy",
            "-avoid_negative_ts", "make_zero",
            "-y", output,
        ])
    }

    fn concat(&self, manifest: &Path, output: &Path) -> Result<()> {
        let manifest = Self::path_str(manifest)?;
        let output = Self::path_str(output)?;
        self.run(&[
            "-f", "concat",
            "-safe", "0",
            "-i", manifest,
            "-c", "copy",
            "-y", output,
        ])
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        std::fs::write(path, data)?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn sandbox_path(&self, name: &str, ext: &str) -> PathBuf {
        self.sandbox.path().join(format!("{name}.{ext}"))
    }
}
