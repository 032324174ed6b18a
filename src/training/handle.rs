use ndarray::ArrayView1;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::{
    arch::{LinearModel, Model, Parameters},
    optimization::Optimizer,
    LabError, Result,
};

/// Lifecycle of a `ModelHandle`. A handle only ever moves forward through these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandleState {
    Untrained,
    /// A fit started but didn't complete; the handle can no longer be fitted nor predicted with.
    Fitting,
    Trained,
}

/// A built model together with the optimizer and random source it will be trained with.
///
/// Every training run needs its own handle, built through `ModelTrainer::build`.
pub struct ModelHandle {
    pub(super) config_id: usize,
    pub(super) learning_rate: f64,
    pub(super) model: LinearModel,
    pub(super) optimizer: Box<dyn Optimizer + Send>,
    pub(super) rng: StdRng,
    pub(super) state: HandleState,
}

impl ModelHandle {
    pub fn config_id(&self) -> usize {
        self.config_id
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_trained(&self) -> bool {
        self.state == HandleState::Trained
    }

    /// Predicts a target for every input.
    ///
    /// # Returns
    /// The predictions, in input order, or `NotTrained` if the handle hasn't completed a fit.
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(LabError::NotTrained);
        }

        Ok(self.model.forward(ArrayView1::from(inputs)).to_vec())
    }

    /// Reads back the learned parameters.
    ///
    /// # Returns
    /// The weight and bias, or `NotTrained` if the handle hasn't completed a fit.
    pub fn parameters(&self) -> Result<Parameters> {
        if !self.is_trained() {
            return Err(LabError::NotTrained);
        }

        Ok(self.model.parameters())
    }
}
