use crate::Result;

/// Defines the strategy for updating model parameters based on calculated gradients.
pub trait Optimizer {
    /// Updates the provided slice of parameters using the given gradient.
    ///
    /// # Arguments
    /// * `grad` - A reference to the model's gradient.
    /// * `params` - The parameters to update.
    ///
    /// # Returns
    /// An error if there's a mismatch in the sizes of `grad` and `params`.
    fn update_params(&mut self, grad: &[f64], params: &mut [f64]) -> Result<()>;
}

pub(super) fn check_sizes(grad: &[f64], params: &[f64]) -> Result<()> {
    if grad.len() != params.len() {
        return Err(crate::LabError::InvalidArgument(format!(
            "gradient has {} entries but there are {} parameters",
            grad.len(),
            params.len()
        )));
    }
    Ok(())
}
