pub mod arch;
pub mod comparison;
pub mod config;
pub mod data;
mod error;
pub mod evaluation;
pub mod optimization;
pub mod report;
pub mod session;
pub mod training;

pub use error::{LabError, Result};
