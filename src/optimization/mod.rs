mod adam;
mod gradient_descent;
mod kind;
mod optimizer;

pub use adam::Adam;
pub use gradient_descent::GradientDescent;
pub use kind::OptimizerKind;
pub use optimizer::Optimizer;
