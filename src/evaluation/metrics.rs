use serde::Serialize;

use super::BandSummary;
use crate::{data::SampleSet, training::ModelHandle, LabError, Result};

/// Error statistics of a set of predictions against their expected values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// The inputs the predictions were made for. Empty when only the outputs were evaluated.
    inputs: Vec<f64>,
    expected: Vec<f64>,
    predicted: Vec<f64>,
    per_point_abs_error: Vec<f64>,
    /// `None` where the expected value is 0.
    per_point_pct_error: Vec<Option<f64>>,
    mae: f64,
    max_error: f64,
    min_error: f64,
    r2: f64,
    /// MAE relative to the mean expected value, `None` when that mean is 0.
    average_error_percent: Option<f64>,
    bands: BandSummary,
}

impl EvaluationResult {
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }

    pub fn per_point_abs_error(&self) -> &[f64] {
        &self.per_point_abs_error
    }

    pub fn per_point_pct_error(&self) -> &[Option<f64>] {
        &self.per_point_pct_error
    }

    pub fn mae(&self) -> f64 {
        self.mae
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn min_error(&self) -> f64 {
        self.min_error
    }

    pub fn r2(&self) -> f64 {
        self.r2
    }

    pub fn average_error_percent(&self) -> Option<f64> {
        self.average_error_percent
    }

    pub fn bands(&self) -> BandSummary {
        self.bands
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }
}

/// Computes the error statistics of `predicted` against `expected`.
///
/// # Returns
/// `LengthMismatch` if the sequences aren't aligned, `InvalidArgument` if they are empty and
/// `DivisionByZero` if every expected value is the same, which leaves R² undefined. No partial
/// result is produced on failure.
pub fn evaluate(predicted: &[f64], expected: &[f64]) -> Result<EvaluationResult> {
    if predicted.len() != expected.len() {
        return Err(LabError::LengthMismatch {
            predicted: predicted.len(),
            expected: expected.len(),
        });
    }
    if expected.is_empty() {
        return Err(LabError::InvalidArgument(
            "cannot evaluate an empty set of predictions".into(),
        ));
    }

    let n = expected.len() as f64;
    let per_point_abs_error: Vec<f64> = predicted
        .iter()
        .zip(expected)
        .map(|(p, e)| (p - e).abs())
        .collect();

    let mae = per_point_abs_error.iter().sum::<f64>() / n;
    let max_error = extreme(&per_point_abs_error, f64::NEG_INFINITY, |e, acc| e > acc);
    let min_error = extreme(&per_point_abs_error, f64::INFINITY, |e, acc| e < acc);

    let mean_expected = expected.iter().sum::<f64>() / n;
    let ss_tot: f64 = expected.iter().map(|e| (e - mean_expected).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(LabError::DivisionByZero("r2"));
    }
    let ss_res: f64 = predicted
        .iter()
        .zip(expected)
        .map(|(p, e)| (e - p).powi(2))
        .sum();
    let r2 = 1.0 - ss_res / ss_tot;

    let per_point_pct_error = per_point_abs_error
        .iter()
        .zip(expected)
        .map(|(err, e)| (*e != 0.0).then(|| err / e.abs() * 100.0))
        .collect();
    let average_error_percent = (mean_expected != 0.0).then(|| mae / mean_expected * 100.0);

    Ok(EvaluationResult {
        inputs: Vec::new(),
        expected: expected.to_vec(),
        predicted: predicted.to_vec(),
        bands: BandSummary::from_errors(&per_point_abs_error),
        per_point_abs_error,
        per_point_pct_error,
        mae,
        max_error,
        min_error,
        r2,
        average_error_percent,
    })
}

/// Folds `errors` down to the value `better` prefers. A NaN error poisons the result, the same
/// way it poisons the mean.
fn extreme(errors: &[f64], init: f64, better: impl Fn(f64, f64) -> bool) -> f64 {
    errors.iter().copied().fold(init, |acc, e| {
        if acc.is_nan() {
            acc
        } else if e.is_nan() || better(e, acc) {
            e
        } else {
            acc
        }
    })
}

/// Runs a trained model over `set` and evaluates its predictions against the set's targets.
///
/// # Returns
/// `NotTrained` if the handle hasn't completed a fit, otherwise the same errors as `evaluate`.
pub fn evaluate_model(handle: &ModelHandle, set: &SampleSet) -> Result<EvaluationResult> {
    let predicted = handle.predict(set.xs())?;
    let mut result = evaluate(&predicted, set.ys())?;
    result.inputs = set.xs().to_vec();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let expected = [1.0, 3.0, 5.0, 7.0];
        let result = evaluate(&expected, &expected).unwrap();

        assert_eq!(result.mae(), 0.0);
        assert_eq!(result.max_error(), 0.0);
        assert_eq!(result.min_error(), 0.0);
        assert_eq!(result.r2(), 1.0);
        assert_eq!(result.bands().excellent, 4);
    }

    #[test]
    fn error_statistics() {
        let predicted = [1.5, 2.0, 6.0];
        let expected = [1.0, 3.0, 5.0];
        let result = evaluate(&predicted, &expected).unwrap();

        assert_eq!(result.per_point_abs_error(), &[0.5, 1.0, 1.0]);
        assert!((result.mae() - 2.5 / 3.0).abs() < 1e-12);
        assert_eq!(result.max_error(), 1.0);
        assert_eq!(result.min_error(), 0.5);
        // ss_res = 0.25 + 1 + 1, ss_tot = 4 + 0 + 4
        assert!((result.r2() - (1.0 - 2.25 / 8.0)).abs() < 1e-12);
        assert_eq!(result.per_point_pct_error()[0], Some(50.0));
        assert!((result.average_error_percent().unwrap() - 2.5 / 9.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.bands().fair, 1);
        assert_eq!(result.bands().needs_improvement, 2);
        assert!(result.inputs().is_empty());
    }

    #[test]
    fn zero_expected_has_no_percentage() {
        let result = evaluate(&[0.5, 2.0], &[0.0, 2.0]).unwrap();
        assert_eq!(result.per_point_pct_error(), &[None, Some(0.0)]);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let err = evaluate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert!(matches!(
            err,
            LabError::LengthMismatch {
                predicted: 3,
                expected: 4
            }
        ));
    }

    #[test]
    fn constant_expected_values_leave_r2_undefined() {
        let err = evaluate(&[1.0, 2.0], &[3.0, 3.0]).unwrap_err();
        assert!(matches!(err, LabError::DivisionByZero(_)));
    }

    #[test]
    fn nan_predictions_poison_the_extremes() {
        let all_nan = evaluate(&[f64::NAN, f64::NAN], &[0.0, 1.0]).unwrap();
        assert!(all_nan.mae().is_nan());
        assert!(all_nan.max_error().is_nan());
        assert!(all_nan.min_error().is_nan());

        let mixed = evaluate(&[f64::NAN, 1.0, 2.0], &[0.0, 1.0, 3.0]).unwrap();
        assert!(mixed.mae().is_nan());
        assert!(mixed.max_error().is_nan());
        assert!(mixed.min_error().is_nan());
        assert_eq!(mixed.bands().needs_improvement, 2);
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            evaluate(&[], &[]),
            Err(LabError::InvalidArgument(_))
        ));
    }
}
