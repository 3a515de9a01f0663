pub mod aggregator;
pub mod sample;

pub use aggregator::{Aggregator, CoreAccumulator};
pub use sample::{Sample, SampleReader};
