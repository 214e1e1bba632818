//! Web layer based on [casefold] components and axum.
//!
//! `axum` is a web application framework built with an imperative approach - integration with the
//! [casefold] container allows for handlers grouped in [*Controllers*](controller::Controller),
//! which receive their dependencies from the container instead of constructing them.
//!
//! ### Simple usage example
//!
//! ```no_run
//! use casefold::application;
//! use casefold::container::{ComponentContainer, ComponentInstancePtr, ErrorPtr};
//! use casefold_web_axum::axum::routing::get;
//! use casefold_web_axum::axum::Router;
//! use casefold_web_axum::controller::{Controller, ControllerPtr};
//!
//! struct ExampleController;
//!
//! impl Controller for ExampleController {
//!     fn configure_router(&self, router: Router) -> Result<Router, ErrorPtr> {
//!         Ok(router.route("/", get(|| async { "Hello world!" })))
//!     }
//! }
//!
//! // note: for the sake of simplicity, errors are unwrapped, rather than
//! // gracefully handled
//! #[tokio::main]
//! async fn main() {
//!     let mut container = ComponentContainer::new();
//!     container
//!         .register::<ControllerPtr>(ComponentInstancePtr::new(ExampleController))
//!         .unwrap();
//!
//!     // controllers need to be registered before the web components
//!     casefold_web_axum::register_components(&mut container).unwrap();
//!
//!     let application = application::create_default(container).unwrap();
//!     application.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod controller;
pub mod router;
pub mod server;

pub use axum;

use crate::config::{DefaultWebConfigProvider, WebConfigProviderPtr};
use crate::router::{ControllerRouterBootstrap, RouterBootstrapPtr};
use crate::server::{
    CtrlCShutdownSignalSource, DefaultServerBootstrap, ServerBootstrapPtr, ServerRunner,
    ShutdownSignalSourcePtr,
};
use casefold::container::{ComponentContainer, ComponentContainerError, ComponentInstancePtr};
use casefold::runner::ApplicationRunnerPtr;

/// Registers web components in the container: a default implementation for each of
/// [WebConfigProvider](config::WebConfigProvider), [ServerBootstrap](server::ServerBootstrap),
/// [ShutdownSignalSource](server::ShutdownSignalSource) and
/// [RouterBootstrap](router::RouterBootstrap) not already registered, followed by the runner
/// serving requests.
///
/// The default router is built from controllers and router configurers registered at the time of
/// this call.
pub fn register_components(
    container: &mut ComponentContainer,
) -> Result<(), ComponentContainerError> {
    if !container.is_registered::<WebConfigProviderPtr>() {
        container.register::<WebConfigProviderPtr>(ComponentInstancePtr::new(
            DefaultWebConfigProvider::new(),
        ))?;
    }

    if !container.is_registered::<ServerBootstrapPtr>() {
        container
            .register::<ServerBootstrapPtr>(ComponentInstancePtr::new(DefaultServerBootstrap))?;
    }

    if !container.is_registered::<ShutdownSignalSourcePtr>() {
        container.register::<ShutdownSignalSourcePtr>(ComponentInstancePtr::new(
            CtrlCShutdownSignalSource,
        ))?;
    }

    if !container.is_registered::<RouterBootstrapPtr>() {
        let router_bootstrap = ControllerRouterBootstrap::from_container(container);
        container.register::<RouterBootstrapPtr>(ComponentInstancePtr::new(router_bootstrap))?;
    }

    let server_runner = ServerRunner::from_container(container)?;
    container.register::<ApplicationRunnerPtr>(ComponentInstancePtr::new(server_runner))
}
