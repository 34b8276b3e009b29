// crates/clutchreel-media/src/sampler.rs
//
// FrameSampler (C1): deterministically samples uniformly-spaced keyframes
// from a local video file as compressed JPEG stills.
//
// Each sampled timestamp reopens the input and seeks fresh rather than
// keeping one stateful decoder alive across the whole run — at a 10s default
// interval the reopen cost is negligible next to the vision-API round trip
// that follows, and it keeps the per-frame algorithm exactly as described:
// "seek to i * interval; decode; encode; append".

use std::path::Path;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

use clutchreel_core::{CancellationToken, Frame, PipelineError, Progress, Result, SamplerConfig};

use crate::helpers::seek::seek_to_secs;

#[derive(Clone, Copy, Debug)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub duration: f64,
}

pub struct FrameSampler;

impl FrameSampler {
    /// Sample up to `opts.max_frames` keyframes spaced `opts.interval_seconds`
    /// apart. The input handle is acquired fresh per probed value and
    /// released on every exit path, including cancellation and error returns.
    pub fn sample(
        path: &Path,
        opts: &SamplerConfig,
        mut on_progress: impl FnMut(Progress),
        cancel: &CancellationToken,
    ) -> Result<(Vec<Frame>, VideoInfo)> {
        let info = probe_video_info(path)?;

        if !info.duration.is_finite() || info.duration <= 0.0 {
            return Err(PipelineError::MediaMetadataUnavailable);
        }

        let n = ((info.duration / opts.interval_seconds).floor() as u32 + 1).min(opts.max_frames);
        if n == 0 {
            return Ok((Vec::new(), info));
        }

        let (out_w, out_h) = scaled_dims(info.width, info.height, opts.max_width);
        let jpeg_quality = (opts.jpeg_quality.clamp(0.0, 1.0) * 100.0).round() as u8;

        let mut frames = Vec::with_capacity(n as usize);
        for i in 0..n {
            cancel.check()?;

            let timestamp = i as f64 * opts.interval_seconds;
            if timestamp > info.duration {
                break;
            }

            let rgb = decode_frame_at(path, timestamp, out_w, out_h)?;
            let image_bytes = encode_jpeg(&rgb, out_w, out_h, jpeg_quality)
                .map_err(|e| PipelineError::Other(anyhow::anyhow!("jpeg encode failed: {e}")))?;

            frames.push(Frame { timestamp, image_bytes });

            on_progress(Progress::Sampling { current: i + 1, total: n });
        }

        Ok((frames, info))
    }
}

fn scaled_dims(raw_w: u32, raw_h: u32, max_width: u32) -> (u32, u32) {
    if raw_w <= max_width || raw_w == 0 {
        return (even(raw_w.max(2)), even(raw_h.max(2)));
    }
    let scaled_h = ((raw_h as f64) * (max_width as f64) / (raw_w as f64)).round() as u32;
    (even(max_width.max(2)), even(scaled_h.max(2)))
}

fn even(v: u32) -> u32 {
    v & !1
}

fn probe_video_info(path: &Path) -> Result<VideoInfo> {
    let ctx = input(path)
        .map_err(|e| PipelineError::Other(anyhow::anyhow!("open input: {e}")))?;

    let duration = {
        let d = ctx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
        if d > 0.0 {
            d
        } else if let Some(stream) = ctx.streams().best(Type::Video).or_else(|| ctx.streams().best(Type::Audio)) {
            let tb = stream.time_base();
            stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64
        } else {
            0.0
        }
    };

    let video_stream = ctx.streams().best(Type::Video)
        .ok_or(PipelineError::MediaMetadataUnavailable)?;
    let (width, height) = unsafe {
        let p = video_stream.parameters().as_ptr();
        ((*p).width as u32, (*p).height as u32)
    };

    if width == 0 || height == 0 {
        return Err(PipelineError::MediaMetadataUnavailable);
    }

    Ok(VideoInfo { width, height, duration })
}

/// Decode one frame at `target_secs`, scaled to `out_w x out_h` RGB8.
///
/// Seeks backward to the nearest keyframe then decodes forward, discarding
/// frames whose PTS is still short of the target — the seek lands before
/// `target_secs`, never after, so this always converges unless the stream
/// has nothing left to decode (treated as a seek failure).
fn decode_frame_at(path: &Path, target_secs: f64, out_w: u32, out_h: u32) -> Result<Vec<u8>> {
    let mut ictx = input(path)
        .map_err(|e| PipelineError::Other(anyhow::anyhow!("reopen input: {e}")))?;

    let video_idx = ictx.streams().best(Type::Video)
        .ok_or(PipelineError::MediaMetadataUnavailable)?
        .index();

    let target_pts = {
        let stream = ictx.stream(video_idx).unwrap();
        let tb = stream.time_base();
        (target_secs * tb.denominator() as f64 / tb.numerator() as f64) as i64
    };

    seek_to_secs(&mut ictx, target_secs, "sampler");

    // Second context for the decoder, mirroring the probe pattern: avoids a
    // borrow conflict between the seeked `ictx` and its stream parameters.
    let ictx2 = input(path)
        .map_err(|e| PipelineError::Other(anyhow::anyhow!("reopen input: {e}")))?;
    let stream2 = ictx2.stream(video_idx).ok_or(PipelineError::MediaMetadataUnavailable)?;
    let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream2.parameters())
        .map_err(|e| PipelineError::Other(anyhow::anyhow!("codec context: {e}")))?;
    let mut decoder = dec_ctx.decoder().video()
        .map_err(|e| PipelineError::Other(anyhow::anyhow!("video decoder: {e}")))?;

    let mut scaler = SwsContext::get(
        decoder.format(), decoder.width(), decoder.height(),
        Pixel::RGB24, out_w, out_h, Flags::BILINEAR,
    ).map_err(|e| PipelineError::Other(anyhow::anyhow!("scaler: {e}")))?;

    for (stream, packet) in ictx.packets().flatten() {
        if stream.index() != video_idx { continue; }
        if decoder.send_packet(&packet).is_err() { continue; }

        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let pts = decoded.pts().unwrap_or(0);
            if pts < target_pts {
                continue;
            }

            let mut out = ffmpeg::util::frame::video::Video::empty();
            scaler.run(&decoded, &mut out)
                .map_err(|e| PipelineError::Other(anyhow::anyhow!("scale: {e}")))?;

            let stride = out.stride(0);
            let raw = out.data(0);
            let row_bytes = out_w as usize * 3;
            let data: Vec<u8> = (0..out_h as usize)
                .flat_map(|row| &raw[row * stride..row * stride + row_bytes])
                .copied()
                .collect();
            return Ok(data);
        }
    }

    Err(PipelineError::SeekFailed(target_secs))
}

fn encode_jpeg(rgb: &[u8], w: u32, h: u32, quality: u8) -> image::ImageResult<Vec<u8>> {
    use image::codecs::jpeg::JpegEncoder;
    use image::ImageEncoder;

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.write_image(rgb, w, h, image::ExtendedColorType::Rgb8)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_dims_preserve_aspect_when_downscaling() {
        let (w, h) = scaled_dims(1920, 1080, 1280);
        assert_eq!(w, 1280);
        assert_eq!(h, 720);
    }

    #[test]
    fn scaled_dims_unchanged_when_narrower_than_max() {
        let (w, h) = scaled_dims(640, 480, 1280);
        assert_eq!(w, 640);
        assert_eq!(h, 480);
    }

    #[test]
    fn scaled_dims_are_always_even() {
        let (w, h) = scaled_dims(1921, 1081, 1281);
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
    }
}
