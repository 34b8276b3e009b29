// crates/clutchreel-media/src/assembler.rs
//
// Assembler (C4): extracts each chosen interval from the source media
// byte-for-byte and concatenates them into one output stream, without
// re-encoding. Preconditions (non-overlapping, sorted, in-bounds clips) are
// the orchestrator's responsibility — this stage trusts them and fails loud
// if the toolchain itself rejects an interval.

use std::path::PathBuf;

use clutchreel_core::{CancellationToken, Clip, MediaToolchain, PipelineError, Progress, Result};
use clutchreel_core::toolchain::CutSpec;

pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub mime: String,
}

pub struct Assembler;

fn mime_for_extension(ext: &str) -> String {
    match ext.to_ascii_lowercase().as_str() {
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        _ => "video/mp4",
    }.to_string()
}

impl Assembler {
    /// `clips` must be non-empty, pairwise non-overlapping, sorted by start,
    /// and each within `[0, media_duration]` — the orchestrator enforces
    /// this via clamping before calling in.
    pub fn assemble(
        toolchain: &dyn MediaToolchain,
        source: &std::path::Path,
        clips: &[Clip],
        hook: Option<&Clip>,
        mut on_progress: impl FnMut(Progress),
        cancel: &CancellationToken,
    ) -> Result<MediaBlob> {
        if clips.is_empty() {
            return Err(PipelineError::NoHighlights);
        }

        let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("mp4").to_string();

        // Hook (if any) always goes first, per §4.4 / §5 ordering guarantee.
        let ordered: Vec<&Clip> = hook.into_iter().chain(clips.iter()).collect();
        let total = ordered.len();

        let mut intermediate_paths = Vec::with_capacity(total);
        for (i, clip) in ordered.iter().enumerate() {
            cancel.check()?;

            let out_path = toolchain.sandbox_path(&format!("clip_{i}"), &ext);
            let spec = CutSpec {
                input: source,
                start: clip.time_range.start,
                duration: clip.time_range.duration(),
                output: &out_path,
            };
            toolchain.cut(&spec).map_err(|e| {
                PipelineError::AssemblyFailed(stderr_tail(&e))
            })?;
            intermediate_paths.push(out_path);

            // Extraction owns the first 80 points, linear in `i` per §4.4.
            let percent = (80 * (i + 1) / total) as u8;
            on_progress(Progress::Assembling { percent });
        }

        cancel.check()?;

        let manifest_path = toolchain.sandbox_path("manifest", "txt");
        let manifest = intermediate_paths.iter()
            .map(|p| format!("file '{}'", p.display().to_string().replace('\'', "'\\''")))
            .collect::<Vec<_>>()
            .join("\n");
        toolchain.write_file(&manifest_path, manifest.as_bytes())
            .map_err(|e| PipelineError::AssemblyFailed(stderr_tail(&e)))?;

        let output_path = toolchain.sandbox_path("output", &ext);
        toolchain.concat(&manifest_path, &output_path)
            .map_err(|e| PipelineError::AssemblyFailed(stderr_tail(&e)))?;

        // Concat owns 80-95; it either completes as one unit or fails above.
        on_progress(Progress::Assembling { percent: 95 });

        let bytes = toolchain.read_file(&output_path)
            .map_err(|e| PipelineError::AssemblyFailed(stderr_tail(&e)))?;

        cleanup(toolchain, &intermediate_paths, &manifest_path, &output_path);

        // Finalise (read-back + cleanup) owns 95-100.
        on_progress(Progress::Assembling { percent: 100 });

        Ok(MediaBlob { bytes, mime: mime_for_extension(&ext) })
    }
}

fn stderr_tail(e: &anyhow::Error) -> String {
    e.to_string()
}

/// Best-effort cleanup — failure to remove a sandbox file never fails the run.
fn cleanup(toolchain: &dyn MediaToolchain, intermediates: &[PathBuf], manifest: &std::path::Path, output: &std::path::Path) {
    for p in intermediates {
        if let Err(e) = toolchain.delete_file(p) {
            log::warn!("cleanup: failed to remove {}: {e}", p.display());
        }
    }
    if let Err(e) = toolchain.delete_file(manifest) {
        log::warn!("cleanup: failed to remove manifest {}: {e}", manifest.display());
    }
    if let Err(e) = toolchain.delete_file(output) {
        log::warn!("cleanup: failed to remove output {}: {e}", output.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    use clutchreel_core::{ActionIntensity, ClipType, QualityScore, TimeRange};

    /// A stub toolchain that never shells out — records calls and serves
    /// fixed bytes for `read_file`, per design notes §9.
    #[derive(Default)]
    struct StubToolchain {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
        cuts: RefCell<Vec<(f64, f64)>>,
        concat_called: RefCell<bool>,
    }

    impl MediaToolchain for StubToolchain {
        fn cut(&self, spec: &CutSpec) -> anyhow::Result<()> {
            self.cuts.borrow_mut().push((spec.start, spec.duration));
            self.files.borrow_mut().insert(spec.output.to_path_buf(), b"clip".to_vec());
            Ok(())
        }
        fn concat(&self, _manifest: &Path, output: &Path) -> anyhow::Result<()> {
            *self.concat_called.borrow_mut() = true;
            self.files.borrow_mut().insert(output.to_path_buf(), b"final".to_vec());
            Ok(())
        }
        fn write_file(&self, path: &Path, data: &[u8]) -> anyhow::Result<()> {
            self.files.borrow_mut().insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
        fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| anyhow::anyhow!("missing {}", path.display()))
        }
        fn delete_file(&self, path: &Path) -> anyhow::Result<()> {
            self.files.borrow_mut().remove(path);
            Ok(())
        }
        fn sandbox_path(&self, name: &str, ext: &str) -> PathBuf {
            PathBuf::from(format!("/sandbox/{name}.{ext}"))
        }
    }

    fn clip(start: f64, end: f64) -> Clip {
        Clip::new(TimeRange::new(start, end), ClipType::Generic, "", "", 5, QualityScore::new(50.0), ActionIntensity::Medium)
    }

    #[test]
    fn assembles_hook_first_then_clips_in_order() {
        let tc = StubToolchain::default();
        let clips = vec![clip(10.0, 15.0), clip(30.0, 36.0)];
        let hook = clip(0.0, 3.0);
        let cancel = CancellationToken::new();
        let blob = Assembler::assemble(&tc, Path::new("src.mp4"), &clips, Some(&hook), |_| {}, &cancel).unwrap();
        assert_eq!(blob.bytes, b"final");
        assert_eq!(blob.mime, "video/mp4");
        assert_eq!(*tc.cuts.borrow(), vec![(0.0, 3.0), (10.0, 5.0), (30.0, 6.0)]);
        assert!(*tc.concat_called.borrow());
    }

    #[test]
    fn empty_clips_error_before_touching_toolchain() {
        let tc = StubToolchain::default();
        let cancel = CancellationToken::new();
        let err = Assembler::assemble(&tc, Path::new("src.mp4"), &[], None, |_| {}, &cancel);
        assert!(matches!(err, Err(PipelineError::NoHighlights)));
        assert!(tc.cuts.borrow().is_empty());
    }

    #[test]
    fn mime_follows_source_extension() {
        assert_eq!(mime_for_extension("mkv"), "video/x-matroska");
        assert_eq!(mime_for_extension("MP4"), "video/mp4");
        assert_eq!(mime_for_extension("unknown"), "video/mp4");
    }
}
