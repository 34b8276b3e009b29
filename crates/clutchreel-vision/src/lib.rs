// crates/clutchreel-vision/src/lib.rs

mod client;
mod parse;
mod prompt;

pub use client::VisionClient;
