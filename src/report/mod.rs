//! Gathering cell results into totals, progress and a final summary.

mod accumulator;
pub mod render;
mod sample;
mod summary;

pub use accumulator::{Accumulator, BodyOutcome, CellOutcome, Totals};
pub use sample::{tint, CollectingSink, NullSink, Sample, SampleSink};
pub use summary::Summary;
