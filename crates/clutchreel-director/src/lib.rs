// crates/clutchreel-director/src/lib.rs
//
// CreativeDirector (C3): a pure function from a run's frame analyses to an
// ordered set of clip intervals. No I/O, no mutable shared state — every
// phase below is a plain transformation over owned data, which is what
// makes `direct()` safe to call twice on the same input and get identical
// output (see invariant 7 in the source material).

mod compose;
mod director;
mod events;
mod metrics;
mod pacing;
mod propose;
mod scoring;

pub use director::{direct, DirectResult};
pub use events::{ClutchMoment, MomentumDirection, MomentumShift, MultiKillEvent, MultiKillKind};
pub use metrics::{EngagementCurve, VarietyAnalysis};
