// crates/clutchreel-media/src/helpers/seek.rs
//
// Seek helper wrapping ffmpeg's avformat seek with consistent soft-fail
// behaviour across platforms.
//
// Background: `avformat_seek_file` can return EPERM on a freshly-opened
// context with max_ts=0, or on containers that don't support random access.
// Rather than duplicating the guard + log pattern at every call site, every
// seek in the sampler routes through here.

use ffmpeg_the_third as ffmpeg;

/// Seek `ictx` to `target_secs` seconds from the start of the file.
///
/// Returns `true` if the seek succeeded (or was skipped because the target
/// is 0). Returns `false` if the seek failed — the demuxer decodes from
/// wherever it currently is, and the caller's PTS-based frame filtering
/// skips pre-roll frames correctly.
///
/// # Why backward seek (`..=seek_ts`)
/// A forward seek (`seek_ts..`) lands on the keyframe AT OR AFTER
/// `target_secs`, which can be several seconds away mid-GOP. A backward seek
/// lands on the keyframe before `target_secs`; the caller discards pre-roll
/// frames by PTS, so the first frame returned is still at the right spot.
///
/// # Why skip at 0.0
/// `avformat_seek_file(max_ts=0)` returns EPERM on some platforms when called
/// on a freshly-opened context. The demuxer already starts at position 0, so
/// skipping the seek entirely is both correct and avoids the error.
pub fn seek_to_secs(
    ictx: &mut ffmpeg::format::context::Input,
    target_secs: f64,
    label: &str,
) -> bool {
    if target_secs <= 0.0 {
        return true;
    }

    let seek_ts = (target_secs * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
    match ictx.seek(seek_ts, ..=seek_ts) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "seek soft-fail in {label} at {target_secs:.3}s: {e} — decoding from current position"
            );
            false
        }
    }
}
