use ndarray::{Array1, ArrayView1};

use super::{loss::LossFn, Parameters};
use crate::{optimization::Optimizer, Result};

/// The contract a trainable regression model fulfils towards the trainer.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Predicts a target for every input. Never mutates the model.
    fn forward(&self, x: ArrayView1<f64>) -> Array1<f64>;

    /// Computes the gradient of the loss function with respect to the parameters of the model over
    /// the provided batches. **The parameters get updated** for each batch according to the
    /// optimization algorithm.
    ///
    /// # Arguments
    /// * `loss_fn` - The loss function.
    /// * `optimizer` - The optimizer that dictates how to update the parameters on each gradient calculation.
    /// * `batches` - The batches of data.
    ///
    /// # Returns
    /// The epoch loss, that is, the sample-weighted mean of the batch losses.
    fn backprop<'a, L, O, I>(&mut self, loss_fn: &L, optimizer: &mut O, batches: I) -> Result<f64>
    where
        L: LossFn,
        O: Optimizer + ?Sized,
        I: Iterator<Item = (ArrayView1<'a, f64>, ArrayView1<'a, f64>)>;

    /// Reads back the learned parameters.
    fn parameters(&self) -> Parameters;
}
