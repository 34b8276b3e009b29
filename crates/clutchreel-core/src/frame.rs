// crates/clutchreel-core/src/frame.rs
//
// A single sampled still, handed from `clutchreel-media::FrameSampler` to
// `clutchreel-vision::VisionClient`. Plain data — no decode/encode logic
// belongs here.

#[derive(Clone, Debug)]
pub struct Frame {
    pub timestamp: f64,
    pub image_bytes: Vec<u8>,
}
