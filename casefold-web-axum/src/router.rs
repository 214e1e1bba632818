//! Controller routing handling. By default, routing is based on gathering registered controllers and
//! their request handlers, and then applying every registered [RouterConfigure].

use crate::controller::ControllerPtr;
use axum::Router;
use casefold::container::{ComponentContainer, ComponentInstancePtr, ErrorPtr};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

pub type RouterBootstrapPtr = dyn RouterBootstrap + Send + Sync;

pub type RouterConfigurePtr = dyn RouterConfigure + Send + Sync;

/// Trait for creating a [Router], usually based on registered
/// [Controller](crate::controller::Controller)s.
pub trait RouterBootstrap {
    /// Creates a new [Router] for the server with given name.
    fn bootstrap_router(&self, server_name: &str) -> Result<Router, ErrorPtr>;
}

/// Configures the fully assembled [Router], e.g. by adding layers shared by all controllers.
#[cfg_attr(test, automock)]
pub trait RouterConfigure {
    fn configure(&self, router: Router) -> Result<Router, ErrorPtr>;
}

pub(crate) struct ControllerRouterBootstrap {
    controllers: Vec<ComponentInstancePtr<ControllerPtr>>,
    router_configurers: Vec<ComponentInstancePtr<RouterConfigurePtr>>,
}

impl ControllerRouterBootstrap {
    pub(crate) fn from_container(container: &ComponentContainer) -> Self {
        Self {
            controllers: container.instances::<ControllerPtr>(),
            router_configurers: container.instances::<RouterConfigurePtr>(),
        }
    }
}

impl RouterBootstrap for ControllerRouterBootstrap {
    fn bootstrap_router(&self, server_name: &str) -> Result<Router, ErrorPtr> {
        let router = self
            .controllers
            .iter()
            .filter(|controller| {
                controller
                    .server_names()
                    .map(|server_names| server_names.contains(server_name))
                    .unwrap_or(true)
            })
            .try_fold(Router::new(), |router, controller| {
                controller.configure_router(router)
            })?;

        debug!(server_name, "Configured controller routes.");

        self.router_configurers
            .iter()
            .try_fold(router, |router, configurer| configurer.configure(router))
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::MockController;
    use crate::router::{ControllerRouterBootstrap, MockRouterConfigure, RouterBootstrap};
    use casefold::container::{ComponentInstancePtr, ErrorPtr};
    use fxhash::FxHashSet;
    use std::fmt::{Display, Formatter};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError;

    impl Display for TestError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    impl std::error::Error for TestError {}

    fn server_names() -> FxHashSet<String> {
        ["1".to_string(), "2".to_string()].into_iter().collect()
    }

    #[test]
    fn should_configure_router_with_filtering() {
        let mut controller = MockController::new();
        controller
            .expect_configure_router()
            .times(1)
            .returning(Ok);
        controller
            .expect_server_names()
            .times(1)
            .return_const(server_names());

        let bootstrap = ControllerRouterBootstrap {
            controllers: vec![ComponentInstancePtr::new(controller)],
            router_configurers: vec![],
        };
        assert!(bootstrap.bootstrap_router("1").is_ok());
    }

    #[test]
    fn should_not_configure_router_with_filtering() {
        let mut controller = MockController::new();
        controller
            .expect_configure_router()
            .times(0)
            .returning(Ok);
        controller
            .expect_server_names()
            .times(1)
            .return_const(server_names());

        let bootstrap = ControllerRouterBootstrap {
            controllers: vec![ComponentInstancePtr::new(controller)],
            router_configurers: vec![],
        };
        assert!(bootstrap.bootstrap_router("3").is_ok());
    }

    #[test]
    fn should_configure_router_for_every_server_without_names() {
        let mut controller = MockController::new();
        controller
            .expect_configure_router()
            .times(1)
            .returning(Ok);
        controller
            .expect_server_names()
            .times(1)
            .return_const(None::<FxHashSet<String>>);

        let mut configurer = MockRouterConfigure::new();
        configurer.expect_configure().times(1).returning(Ok);

        let bootstrap = ControllerRouterBootstrap {
            controllers: vec![ComponentInstancePtr::new(controller)],
            router_configurers: vec![ComponentInstancePtr::new(configurer)],
        };
        assert!(bootstrap.bootstrap_router("any").is_ok());
    }

    #[test]
    fn should_stop_on_controller_error() {
        let mut controller = MockController::new();
        controller
            .expect_configure_router()
            .times(1)
            .returning(|_| Err(Arc::new(TestError) as ErrorPtr));
        controller
            .expect_server_names()
            .return_const(None::<FxHashSet<String>>);

        let mut configurer = MockRouterConfigure::new();
        configurer.expect_configure().times(0);

        let bootstrap = ControllerRouterBootstrap {
            controllers: vec![ComponentInstancePtr::new(controller)],
            router_configurers: vec![ComponentInstancePtr::new(configurer)],
        };
        assert!(bootstrap.bootstrap_router("1").is_err());
    }
}
