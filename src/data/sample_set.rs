use ndarray::Array1;
use serde::Serialize;

use crate::{LabError, Result};

/// A single supervised sample (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// An ordered, immutable sequence of (x, y) pairs.
///
/// The length is fixed when the set is created and there is no way to mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleSet {
    /// Creates a new `SampleSet` from owned buffers.
    ///
    /// # Arguments
    /// * `xs` - The inputs.
    /// * `ys` - The targets, aligned with `xs`.
    ///
    /// # Returns
    /// An error if the buffers differ in length or are empty.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(LabError::InvalidArgument(format!(
                "xs and ys must have the same length, got {} and {}",
                xs.len(),
                ys.len()
            )));
        }

        if xs.is_empty() {
            return Err(LabError::InvalidArgument(
                "a sample set must hold at least one sample".into(),
            ));
        }

        Ok(Self { xs, ys })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Returns the sample at `idx`, if any.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Sample> {
        Some(Sample {
            x: *self.xs.get(idx)?,
            y: *self.ys.get(idx)?,
        })
    }

    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| Sample { x, y })
    }

    /// Owned copies of the inputs and targets.
    pub fn to_arrays(&self) -> (Array1<f64>, Array1<f64>) {
        (Array1::from(self.xs.clone()), Array1::from(self.ys.clone()))
    }

    /// Iterates over the samples whose input lies beyond `train_x_max`, that is, the points
    /// that test extrapolation rather than interpolation.
    pub fn extrapolated(&self, train_x_max: f64) -> impl Iterator<Item = Sample> + '_ {
        self.iter().filter(move |s| s.x > train_x_max)
    }
}
