mod handle;
mod observer;
mod run;
mod trainer;

pub use handle::{HandleState, ModelHandle};
pub use observer::EpochObserver;
pub use run::{convergence_epoch, TrainingRun, CONVERGENCE_TOLERANCE};
pub use trainer::{ModelTrainer, TrainerOptions};
