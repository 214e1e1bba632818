//! Core application framework functionality.

use crate::config::{
    ApplicationConfig, ApplicationConfigProviderPtr, DefaultApplicationConfigProvider,
};
use crate::container::{
    ComponentContainer, ComponentContainerError, ComponentInstancePtr, ErrorPtr,
};
use crate::runner::ApplicationRunnerPtr;
use derive_more::Constructor;
use futures::future::try_join_all;
use itertools::Itertools;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error retrieving config provider: {0}")]
    ConfigInjectionError(ComponentContainerError),
    #[error("Error reading application config: {0}")]
    ConfigError(ErrorPtr),
    #[error("Runner error: {0}")]
    RunnerError(ErrorPtr),
}

/// Main entrypoint for the application. Bootstraps the application and runs
/// [ApplicationRunners](crate::runner::ApplicationRunner) found in the container.
#[derive(Constructor)]
pub struct Application {
    container: ComponentContainer,
}

impl Application {
    pub async fn run(&self) -> Result<(), ApplicationError> {
        let config_provider = self
            .container
            .primary_instance::<ApplicationConfigProviderPtr>()
            .map_err(ApplicationError::ConfigInjectionError)?;

        let config = config_provider
            .config()
            .await
            .map_err(ApplicationError::ConfigError)?;

        if config.install_tracing_logger {
            install_tracing_logger(config);
        }

        info!("Searching for application runners...");

        let runners = group_by_priority(self.container.instances::<ApplicationRunnerPtr>());

        info!("Running application runners...");

        for (priority, runners) in runners {
            debug!(priority, count = runners.len(), "Running runner group.");

            try_join_all(runners.iter().map(|runner| runner.run()))
                .await
                .map_err(ApplicationError::RunnerError)?;
        }

        Ok(())
    }
}

/// Creates an [Application] with the default
/// [ApplicationConfigProvider](crate::config::ApplicationConfigProvider) registered, unless the
/// container already has one.
pub fn create_default(
    mut container: ComponentContainer,
) -> Result<Application, ComponentContainerError> {
    if !container.is_registered::<ApplicationConfigProviderPtr>() {
        container.register::<ApplicationConfigProviderPtr>(ComponentInstancePtr::new(
            DefaultApplicationConfigProvider::new(),
        ))?;
    }

    Ok(Application::new(container))
}

fn install_tracing_logger(config: &ApplicationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        debug!("Global tracing logger already installed.");
    }
}

fn group_by_priority(
    mut runners: Vec<ComponentInstancePtr<ApplicationRunnerPtr>>,
) -> Vec<(i8, Vec<ComponentInstancePtr<ApplicationRunnerPtr>>)> {
    runners.sort_by_key(|runner| Reverse(runner.priority()));

    runners
        .into_iter()
        .group_by(|runner| runner.priority())
        .into_iter()
        .map(|(priority, group)| (priority, group.collect_vec()))
        .collect_vec()
}
