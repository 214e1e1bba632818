//! Core server-related functionality.

use crate::config::{ServerConfig, WebConfig, WebConfigProviderPtr};
use crate::router::RouterBootstrapPtr;
use casefold::container::{
    ComponentContainer, ComponentContainerError, ComponentInstancePtr, ErrorPtr,
};
use casefold::runner::{ApplicationRunner, BoxFuture, FutureExt};
use futures::future::{pending, try_join_all};
use hyper::server::conn::AddrIncoming;
use hyper::server::Builder;
use hyper::Error as HyperError;
use std::future::Future;
use std::net::AddrParseError;
use std::sync::Arc;
use thiserror::Error;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{error, info};

/// Sending a value through this sender gracefully stops all running servers.
pub type ShutdownSignalSender = Sender<()>;

pub type ServerBootstrapPtr = dyn ServerBootstrap + Send + Sync;

pub type ShutdownSignalSourcePtr = dyn ShutdownSignalSource + Send + Sync;

/// Errors related to bootstrapping servers.
#[derive(Error, Debug)]
pub enum ServerBootstrapError {
    #[error("Error parsing listen address: {0}")]
    ListenAddressParseError(AddrParseError),
    #[error("Error binding server: {0}")]
    BindError(#[source] HyperError),
    #[error("Error configuring router: {0}")]
    RouterError(#[source] ErrorPtr),
}

/// Trait for components responsible for creating web servers from
/// [ServerConfig](crate::config::ServerConfig). Register a component implementing this trait to
/// override the default bootstrap.
pub trait ServerBootstrap {
    /// Create a bound [Builder] which will then be used to create a web server.
    fn bootstrap_server(
        &self,
        config: &ServerConfig,
    ) -> BoxFuture<'_, Result<Builder<AddrIncoming>, ServerBootstrapError>>;
}

/// Source of the signal stopping all servers. The default source reacts to Ctrl-C. It is registered
/// after all servers are bound, so it can also be used to detect when the servers are ready.
pub trait ShutdownSignalSource {
    fn register_shutdown(&self, shutdown_sender: ShutdownSignalSender) -> Result<(), ErrorPtr>;
}

pub(crate) struct DefaultServerBootstrap;

impl ServerBootstrap for DefaultServerBootstrap {
    fn bootstrap_server(
        &self,
        config: &ServerConfig,
    ) -> BoxFuture<'_, Result<Builder<AddrIncoming>, ServerBootstrapError>> {
        let listen_address = config.listen_address.clone();

        async move {
            axum::Server::try_bind(
                &listen_address
                    .parse()
                    .map_err(ServerBootstrapError::ListenAddressParseError)?,
            )
            .map_err(ServerBootstrapError::BindError)
        }
        .boxed()
    }
}

pub(crate) struct CtrlCShutdownSignalSource;

impl ShutdownSignalSource for CtrlCShutdownSignalSource {
    fn register_shutdown(&self, shutdown_sender: ShutdownSignalSender) -> Result<(), ErrorPtr> {
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl-C, shutting down servers.");
                    // no receivers means the servers are already gone
                    let _ = shutdown_sender.send(());
                }
                Err(error) => error!(%error, "Unable to listen for shutdown signal."),
            }
        });

        Ok(())
    }
}

/// [ApplicationRunner] starting every configured server and serving until shutdown.
pub(crate) struct ServerRunner {
    server_bootstrap: ComponentInstancePtr<ServerBootstrapPtr>,
    router_bootstrap: ComponentInstancePtr<RouterBootstrapPtr>,
    config_provider: ComponentInstancePtr<WebConfigProviderPtr>,
    shutdown_signal_source: ComponentInstancePtr<ShutdownSignalSourcePtr>,
}

impl ApplicationRunner for ServerRunner {
    fn run(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            let config = self.config_provider.config().await?;

            let (shutdown_sender, _) = broadcast::channel(1);
            let servers = self
                .create_servers(config, &shutdown_sender)
                .await
                .map_err(|error| Arc::new(error) as ErrorPtr)?;

            self.shutdown_signal_source
                .register_shutdown(shutdown_sender)?;

            try_join_all(servers.into_iter()).await.map(|_| ())
        }
        .boxed()
    }
}

impl ServerRunner {
    pub(crate) fn from_container(
        container: &ComponentContainer,
    ) -> Result<Self, ComponentContainerError> {
        Ok(Self {
            server_bootstrap: container.primary_instance()?,
            router_bootstrap: container.primary_instance()?,
            config_provider: container.primary_instance()?,
            shutdown_signal_source: container.primary_instance()?,
        })
    }

    async fn create_server(
        &self,
        config: &ServerConfig,
        server_name: &str,
        shutdown_receiver: Receiver<()>,
    ) -> Result<impl Future<Output = Result<(), ErrorPtr>>, ServerBootstrapError> {
        info!(server_name, "Starting server...");

        let router = self
            .router_bootstrap
            .bootstrap_router(server_name)
            .map_err(ServerBootstrapError::RouterError)?;

        let server = self
            .server_bootstrap
            .bootstrap_server(config)
            .await?
            .serve(router.into_make_service());

        info!(server_name, address = %server.local_addr(), "Server listening.");

        let server_name = server_name.to_string();
        Ok(async move {
            let result = server
                .with_graceful_shutdown(wait_for_shutdown(shutdown_receiver))
                .await
                .map_err(|error| Arc::new(error) as ErrorPtr);

            info!(%server_name, "Server stopped.");
            result
        })
    }

    async fn create_servers(
        &self,
        config: &WebConfig,
        shutdown_sender: &ShutdownSignalSender,
    ) -> Result<Vec<impl Future<Output = Result<(), ErrorPtr>>>, ServerBootstrapError> {
        let mut result = Vec::with_capacity(config.servers.len());
        for (server_name, config) in config.servers.iter() {
            result.push(
                self.create_server(config, server_name, shutdown_sender.subscribe())
                    .await?,
            );
        }

        Ok(result)
    }
}

async fn wait_for_shutdown(mut shutdown_receiver: Receiver<()>) {
    // a dropped sender can never signal shutdown
    if let Err(RecvError::Closed) = shutdown_receiver.recv().await {
        pending::<()>().await;
    }
}
