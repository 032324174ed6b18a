/// Gets notified synchronously after each epoch's loss has been recorded, before the next epoch
/// starts. Used to drive incremental progress displays.
pub trait EpochObserver {
    /// # Arguments
    /// * `epoch` - The 1-indexed epoch that just finished.
    /// * `loss` - The loss recorded for that epoch.
    fn on_epoch_end(&mut self, epoch: usize, loss: f64);
}

impl<F> EpochObserver for F
where
    F: FnMut(usize, f64),
{
    fn on_epoch_end(&mut self, epoch: usize, loss: f64) {
        self(epoch, loss)
    }
}
