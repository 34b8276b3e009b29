// crates/clutchreel-media/src/helpers/mod.rs

pub mod seek;
