mod linear;
pub mod loss;
mod model;

pub use linear::{LinearModel, Parameters};
pub use model::Model;
