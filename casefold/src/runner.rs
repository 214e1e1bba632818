//! Runners executing actual application logic.

pub use crate::container::ErrorPtr;
pub use crate::future::{BoxFuture, FutureExt};
#[cfg(test)]
use mockall::automock;

pub type ApplicationRunnerPtr = dyn ApplicationRunner + Send + Sync;

/// Runs application logic. Runners are run by the [Application](crate::application::Application)
/// and are looked up in the [container](crate::container::ComponentContainer) under
/// [ApplicationRunnerPtr]. Runners with the same priority are run concurrently.
#[cfg_attr(test, automock)]
pub trait ApplicationRunner {
    /// Runs any application code.
    fn run(&self) -> BoxFuture<'_, Result<(), ErrorPtr>>;

    /// Returns the priority for this runner. Higher priorities get run first. Default 0.
    fn priority(&self) -> i8 {
        0
    }
}
