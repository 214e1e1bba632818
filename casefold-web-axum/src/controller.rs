//! Functionality related to defining [Controller]s.

use axum::Router;
use casefold::container::ErrorPtr;
use fxhash::FxHashSet;
#[cfg(test)]
use mockall::automock;

pub type ControllerPtr = dyn Controller + Send + Sync;

/// Main trait for components used as controllers - collections of web
/// [handlers](axum::handler::Handler) sharing dependencies taken from the
/// [container](casefold::container::ComponentContainer). Controllers registered in the container
/// under [ControllerPtr] contribute their routes to the router of each server they belong to.
#[cfg_attr(test, automock)]
pub trait Controller {
    /// Adds the routes of this controller to given [Router].
    fn configure_router(&self, router: Router) -> Result<Router, ErrorPtr>;

    /// Names of servers this controller should be attached to. `None` means every server.
    fn server_names(&self) -> Option<FxHashSet<String>> {
        None
    }
}
