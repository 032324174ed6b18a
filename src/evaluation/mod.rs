mod bands;
mod metrics;

pub use bands::{BandSummary, ErrorBand, EXCELLENT_BELOW, FAIR_BELOW};
pub use metrics::{evaluate, evaluate_model, EvaluationResult};
