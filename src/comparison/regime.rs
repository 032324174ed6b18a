use serde::Serialize;

/// Rough behavior expected from a learning rate when fitting the default line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningRateRegime {
    SlowButStable,
    Optimal,
    Fast,
    TooFast,
}

impl LearningRateRegime {
    pub fn of(learning_rate: f64) -> Self {
        match learning_rate {
            lr if lr <= 0.01 => Self::SlowButStable,
            lr if lr <= 0.1 => Self::Optimal,
            lr if lr <= 0.5 => Self::Fast,
            _ => Self::TooFast,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SlowButStable => "slow but stable",
            Self::Optimal => "optimal",
            Self::Fast => "fast",
            Self::TooFast => "too fast",
        }
    }
}
