use serde::Serialize;

/// Absolute errors below this are excellent.
pub const EXCELLENT_BELOW: f64 = 0.5;
/// Absolute errors below this, and not excellent, are fair.
pub const FAIR_BELOW: f64 = 1.0;

/// Quality band of a single prediction's absolute error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBand {
    Excellent,
    Fair,
    NeedsImprovement,
}

impl ErrorBand {
    /// Classifies an absolute error. Non-finite errors need improvement.
    pub fn classify(error: f64) -> Self {
        if error < EXCELLENT_BELOW {
            Self::Excellent
        } else if error < FAIR_BELOW {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs improvement",
        }
    }
}

/// How many predictions fall in each `ErrorBand`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandSummary {
    pub excellent: usize,
    pub fair: usize,
    pub needs_improvement: usize,
}

impl BandSummary {
    pub fn from_errors<'a, I>(errors: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        errors
            .into_iter()
            .fold(Self::default(), |mut summary, &error| {
                match ErrorBand::classify(error) {
                    ErrorBand::Excellent => summary.excellent += 1,
                    ErrorBand::Fair => summary.fair += 1,
                    ErrorBand::NeedsImprovement => summary.needs_improvement += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.excellent + self.fair + self.needs_improvement
    }

    pub fn count(&self, band: ErrorBand) -> usize {
        match band {
            ErrorBand::Excellent => self.excellent,
            ErrorBand::Fair => self.fair,
            ErrorBand::NeedsImprovement => self.needs_improvement,
        }
    }

    /// Fraction of the predictions in `band`, 0 when there are none.
    pub fn fraction(&self, band: ErrorBand) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(band) as f64 / total as f64,
        }
    }
}
