//! Host attachment point for rendered output.

/// Where a mounted instance delivers the output of `view`.
pub trait MountTarget<Output> {
    /// Receives the output of every commit.
    fn render(&mut self, output: Output);

    /// Called once when the instance unmounts.
    fn detach(&mut self) {}
}

/// Discards output; for headless instances.
impl<Output> MountTarget<Output> for () {
    fn render(&mut self, _output: Output) {}
}
