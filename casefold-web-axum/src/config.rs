//! Server addresses, read from the `web` key of `casefold.json`. Without the file, a single
//! [DEFAULT_SERVER_NAME] server listens on port 8080.

use casefold::config::CONFIG_FILE;
use casefold::container::ErrorPtr;
use casefold::future::{BoxFuture, FutureExt};
use config::{Config, File};
use fxhash::FxHashMap;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_SERVER_NAME: &str = "default";

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address, e.g. `127.0.0.1:8080`.
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

/// Servers to start, by name. Configured servers replace the default one.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub servers: FxHashMap<String, ServerConfig>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            servers: [(DEFAULT_SERVER_NAME.to_string(), ServerConfig::default())]
                .into_iter()
                .collect(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    web: WebConfig,
}

fn load_config(config: Config) -> Result<WebConfig, ErrorPtr> {
    config
        .try_deserialize::<ConfigFile>()
        .map(|file| file.web)
        .map_err(|error| Arc::new(error) as ErrorPtr)
}

pub type WebConfigProviderPtr = dyn WebConfigProvider + Send + Sync;

/// Source of [WebConfig] for the server runner. Register one to bypass `casefold.json`.
pub trait WebConfigProvider {
    fn config(&self) -> BoxFuture<'_, Result<&WebConfig, ErrorPtr>>;
}

pub(crate) struct DefaultWebConfigProvider {
    loaded: Result<WebConfig, ErrorPtr>,
}

impl DefaultWebConfigProvider {
    pub(crate) fn new() -> Self {
        let loaded = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .build()
            .map_err(|error| Arc::new(error) as ErrorPtr)
            .and_then(load_config);

        Self { loaded }
    }
}

impl WebConfigProvider for DefaultWebConfigProvider {
    fn config(&self) -> BoxFuture<'_, Result<&WebConfig, ErrorPtr>> {
        async { self.loaded.as_ref().map_err(Arc::clone) }.boxed()
    }
}
