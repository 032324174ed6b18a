use std::{error::Error, fmt, io};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, LabError>;

/// All errors that can occur while generating data, training, evaluating or comparing models.
#[derive(Debug)]
pub enum LabError {
    /// Bad data generation or evaluation parameters.
    InvalidArgument(String),
    /// Bad training hyperparameters or lab configuration, caught before any work starts.
    ConfigurationError(String),
    /// A prediction was requested from a model that hasn't finished fitting.
    NotTrained,
    /// `fit` was called on a handle that has already been fitted (or whose fit failed).
    AlreadyTrained,
    /// The predicted and expected sequences handed to the evaluator differ in length.
    LengthMismatch { predicted: usize, expected: usize },
    /// A statistic has a zero denominator, e.g. R² over constant expected values.
    DivisionByZero(&'static str),
    /// A comparison was requested without any configuration to compare.
    EmptyConfigSet,
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::ConfigurationError(msg) => write!(f, "configuration error: {msg}"),
            Self::NotTrained => write!(f, "the model has not been trained yet"),
            Self::AlreadyTrained => {
                write!(f, "the model handle was already fitted, build a fresh one per run")
            }
            Self::LengthMismatch {
                predicted,
                expected,
            } => write!(
                f,
                "length mismatch: got {predicted} predicted values and {expected} expected values"
            ),
            Self::DivisionByZero(what) => write!(f, "division by zero while computing {what}"),
            Self::EmptyConfigSet => write!(f, "there are no configurations to compare"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for LabError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LabError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LabError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
