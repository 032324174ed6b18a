use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::SampleSet;
use crate::{LabError, Result};

/// Unseen inputs hand-picked to probe a trained model, the last one lying past the usual
/// training range of `[0, 10)`.
pub const PROBE_POINTS: [f64; 6] = [0.5, 2.5, 4.5, 6.5, 8.5, 10.5];

/// The ground-truth relationship `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[inline]
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Produces synthetic samples following a `Line`, either noisy for training or noise-free for
/// evaluation.
pub struct DataGenerator<R: Rng = StdRng> {
    rng: R,
}

impl DataGenerator<StdRng> {
    /// Creates a reproducible generator: the same seed always yields the same sets.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> DataGenerator<R> {
    /// Creates a new `DataGenerator`.
    ///
    /// # Arguments
    /// * `rng` - The random source every draw is taken from.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a noisy training set.
    ///
    /// Each `x` is drawn uniformly from `[0, x_max)` and its target is `line.at(x) + noise`,
    /// with the noise drawn uniformly from `[-noise, noise]`.
    ///
    /// # Arguments
    /// * `count` - The amount of samples to generate.
    /// * `line` - The ground-truth relationship.
    /// * `x_max` - The exclusive upper bound of the input range.
    /// * `noise` - The half width of the symmetric noise range.
    ///
    /// # Returns
    /// The generated set or an `InvalidArgument` error if any parameter is out of its domain.
    pub fn generate_training_set(
        &mut self,
        count: usize,
        line: Line,
        x_max: f64,
        noise: f64,
    ) -> Result<SampleSet> {
        if count == 0 {
            return Err(LabError::InvalidArgument(
                "training set count must be greater than 0".into(),
            ));
        }
        validate_x_max(x_max)?;
        if !noise.is_finite() || noise < 0.0 {
            return Err(LabError::InvalidArgument(format!(
                "noise bound must be a finite non-negative number, got {noise}"
            )));
        }

        let x_dist = Uniform::new(0.0, x_max).map_err(invalid_range)?;
        let noise_dist = Uniform::new_inclusive(-noise, noise).map_err(invalid_range)?;

        let mut xs = Vec::with_capacity(count);
        let mut ys = Vec::with_capacity(count);
        for _ in 0..count {
            let x = x_dist.sample(&mut self.rng);
            let y = line.at(x) + noise_dist.sample(&mut self.rng);
            xs.push(x);
            ys.push(y);
        }

        info!(count = count, slope = line.slope, intercept = line.intercept; "generated training set");
        SampleSet::new(xs, ys)
    }

    /// Generates a noise-free evaluation set with inputs evenly spaced over `[0, x_max]`.
    ///
    /// Passing an `x_max` larger than the training range makes the tail of the set test
    /// extrapolation.
    ///
    /// # Arguments
    /// * `count` - The amount of points, at least 2.
    /// * `line` - The ground-truth relationship.
    /// * `x_max` - The inclusive upper bound of the input range.
    ///
    /// # Returns
    /// The generated set or an `InvalidArgument` error if `count < 2` or `x_max` is invalid.
    pub fn generate_evaluation_set(
        &self,
        count: usize,
        line: Line,
        x_max: f64,
    ) -> Result<SampleSet> {
        if count < 2 {
            return Err(LabError::InvalidArgument(format!(
                "evaluation set needs at least 2 points to define a spacing, got {count}"
            )));
        }
        validate_x_max(x_max)?;

        let step = x_max / (count - 1) as f64;
        let xs: Vec<f64> = (0..count).map(|i| i as f64 * step).collect();
        let ys = xs.iter().map(|&x| line.at(x)).collect();

        info!(count = count, x_max = x_max; "generated evaluation set");
        SampleSet::new(xs, ys)
    }

    /// Builds a noise-free set over caller chosen inputs, e.g. `PROBE_POINTS`.
    pub fn probe_set(&self, xs: &[f64], line: Line) -> Result<SampleSet> {
        if let Some(x) = xs.iter().find(|x| !x.is_finite()) {
            return Err(LabError::InvalidArgument(format!(
                "probe inputs must be finite, got {x}"
            )));
        }

        let ys = xs.iter().map(|&x| line.at(x)).collect();
        SampleSet::new(xs.to_vec(), ys)
    }
}

fn validate_x_max(x_max: f64) -> Result<()> {
    if !x_max.is_finite() || x_max <= 0.0 {
        return Err(LabError::InvalidArgument(format!(
            "x_max must be a finite positive number, got {x_max}"
        )));
    }
    Ok(())
}

fn invalid_range(e: rand::distr::uniform::Error) -> LabError {
    LabError::InvalidArgument(format!("invalid sampling range: {e}"))
}
