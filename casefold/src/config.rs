//! Framework configuration is based on registering an [ApplicationConfigProvider], which can later
//! be used to retrieve [ApplicationConfig]. [Application](crate::application::Application) uses
//! this config to configure itself, but it can also be used by any other component.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `CASEFOLD_` or `casefold.json` file.

use crate::container::ErrorPtr;
use crate::future::{BoxFuture, FutureExt};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::sync::Arc;

const CONFIG_ENV_PREFIX: &str = "CASEFOLD";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "casefold.json";

/// Framework configuration which can be provided by an [ApplicationConfigProvider].
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
    /// Filter directives for the installed logger, used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            log_filter: "info".to_string(),
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            log_filter: value.log_filter.unwrap_or(default.log_filter),
        }
    }
}

impl ApplicationConfig {
    fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

pub type ApplicationConfigProviderPtr = dyn ApplicationConfigProvider + Send + Sync;

/// Provider for [ApplicationConfig]. The primary instance of the provider will be used to retrieve
/// application configuration.
pub trait ApplicationConfigProvider {
    fn config(&self) -> BoxFuture<'_, Result<&ApplicationConfig, ErrorPtr>>;
}

/// Provider reading the config file and environment once, on creation.
pub(crate) struct DefaultApplicationConfigProvider {
    // cached init result
    config: Result<ApplicationConfig, ErrorPtr>,
}

impl DefaultApplicationConfigProvider {
    pub(crate) fn new() -> Self {
        Self {
            config: ApplicationConfig::init_from_environment()
                .map_err(|error| Arc::new(error) as ErrorPtr),
        }
    }
}

impl ApplicationConfigProvider for DefaultApplicationConfigProvider {
    fn config(&self) -> BoxFuture<'_, Result<&ApplicationConfig, ErrorPtr>> {
        async {
            match &self.config {
                Ok(config) => Ok(config),
                Err(error) => Err(error.clone()),
            }
        }
        .boxed()
    }
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
    log_filter: Option<String>,
}
