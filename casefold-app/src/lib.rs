//! Case conversion web service. Exposes [CaseService](service::CaseService) over HTTP:
//!
//! * `POST /upperCase?value=Lu` responds with `LU`
//! * `POST /lowerCase?value=Lu` responds with `lu`
//!
//! Requests without the `value` parameter are answered with `400 Bad Request`.

pub mod controller;
pub mod service;
pub mod trace;

use crate::controller::CaseController;
use crate::service::{CaseServicePtr, DefaultCaseService};
use crate::trace::RequestTraceRouterConfigure;
use casefold::application::{self, Application, ApplicationError};
use casefold::container::{ComponentContainer, ComponentContainerError, ComponentInstancePtr};
use casefold_web_axum::controller::ControllerPtr;
use casefold_web_axum::router::RouterConfigurePtr;
use thiserror::Error;

/// Errors preventing the application from starting or running.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Error registering components: {0}")]
    ComponentError(#[from] ComponentContainerError),
    #[error("Application error: {0}")]
    ApplicationError(#[from] ApplicationError),
}

/// Registers the case service (unless one is already registered), the case controller, request
/// tracing and all web components.
pub fn register_components(
    container: &mut ComponentContainer,
) -> Result<(), ComponentContainerError> {
    if !container.is_registered::<CaseServicePtr>() {
        container.register::<CaseServicePtr>(ComponentInstancePtr::new(DefaultCaseService))?;
    }

    let controller = CaseController::from_container(container)?;
    container.register::<ControllerPtr>(ComponentInstancePtr::new(controller))?;
    container
        .register::<RouterConfigurePtr>(ComponentInstancePtr::new(RequestTraceRouterConfigure))?;

    casefold_web_axum::register_components(container)
}

/// Creates the application from given container, after registering all service components in it.
/// Components registered beforehand take precedence over the defaults.
pub fn create_application(
    mut container: ComponentContainer,
) -> Result<Application, BootstrapError> {
    register_components(&mut container)?;
    Ok(application::create_default(container)?)
}

/// Creates and runs the application until its servers shut down.
pub async fn run(container: ComponentContainer) -> Result<(), BootstrapError> {
    create_application(container)?.run().await?;
    Ok(())
}
