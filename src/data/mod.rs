mod batches;
mod generator;
mod sample_set;

pub(crate) use batches::Batches;
pub use generator::{DataGenerator, Line, PROBE_POINTS};
pub use sample_set::{Sample, SampleSet};
