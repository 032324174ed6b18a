use ndarray::{Array1, ArrayView1};

use super::LossFn;

/// Mean squared error loss function.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl LossFn for Mse {
    fn loss(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (&y_pred - &y)
            .mapv(|x| x.powi(2))
            .mean()
            .unwrap_or_default()
    }

    fn loss_prime(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        (&y_pred - &y) * (2.0 / y_pred.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn loss_is_the_mean_of_squares() {
        let y_pred = array![1.0, 2.0, 3.0];
        let y = array![1.0, 4.0, 0.0];
        assert_eq!(Mse.loss(y_pred.view(), y.view()), (0.0 + 4.0 + 9.0) / 3.0);
    }

    #[test]
    fn derivative_scales_the_residuals() {
        let y_pred = array![1.0, 3.0];
        let y = array![0.0, 0.0];
        assert_eq!(Mse.loss_prime(y_pred.view(), y.view()), array![1.0, 3.0]);
    }
}
