use casefold::application::{self, ApplicationError};
use casefold::container::{ComponentContainer, ComponentInstancePtr, ErrorPtr};
use casefold::future::{BoxFuture, FutureExt};
use casefold_web_axum::axum::routing::get;
use casefold_web_axum::axum::Router;
use casefold_web_axum::config::{
    ServerConfig, WebConfig, WebConfigProvider, WebConfigProviderPtr, DEFAULT_SERVER_NAME,
};
use casefold_web_axum::controller::{Controller, ControllerPtr};
use casefold_web_axum::server::{
    ServerBootstrapError, ShutdownSignalSender, ShutdownSignalSource, ShutdownSignalSourcePtr,
};
use fxhash::FxHashSet;
use portpicker::pick_unused_port;
use reqwest::StatusCode;
use std::net::TcpListener;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;

struct TestController;

impl Controller for TestController {
    fn configure_router(&self, router: Router) -> Result<Router, ErrorPtr> {
        Ok(router.route(
            "/test",
            get(|| async { "Hello world!" }).post(|| async { "Posted!" }),
        ))
    }
}

struct OtherServerController;

impl Controller for OtherServerController {
    fn configure_router(&self, router: Router) -> Result<Router, ErrorPtr> {
        Ok(router.route("/other", get(|| async { "Other" })))
    }

    fn server_names(&self) -> Option<FxHashSet<String>> {
        Some(["other".to_string()].into_iter().collect())
    }
}

struct TestWebConfigProvider {
    config: WebConfig,
}

impl TestWebConfigProvider {
    fn new(listen_address: String) -> Self {
        let mut server_config = ServerConfig::default();
        server_config.listen_address = listen_address;

        let mut config = WebConfig::default();
        config.servers = [(DEFAULT_SERVER_NAME.to_string(), server_config)]
            .into_iter()
            .collect();

        Self { config }
    }
}

impl WebConfigProvider for TestWebConfigProvider {
    fn config(&self) -> BoxFuture<'_, Result<&WebConfig, ErrorPtr>> {
        async { Ok(&self.config) }.boxed()
    }
}

// hands the shutdown sender over to the test once servers are bound
struct TestShutdownSignalSource {
    ready: Mutex<Option<oneshot::Sender<ShutdownSignalSender>>>,
}

impl ShutdownSignalSource for TestShutdownSignalSource {
    fn register_shutdown(&self, shutdown_sender: ShutdownSignalSender) -> Result<(), ErrorPtr> {
        if let Some(ready) = self.ready.lock().unwrap().take() {
            ready.send(shutdown_sender).unwrap();
        }

        Ok(())
    }
}

#[tokio::test]
async fn should_serve_registered_controllers_until_shutdown() {
    let port = pick_unused_port().unwrap();
    let (ready_sender, ready_receiver) = oneshot::channel();

    let mut container = ComponentContainer::new();
    container
        .register::<ControllerPtr>(ComponentInstancePtr::new(TestController))
        .unwrap();
    container
        .register::<ControllerPtr>(ComponentInstancePtr::new(OtherServerController))
        .unwrap();
    container
        .register::<WebConfigProviderPtr>(ComponentInstancePtr::new(
            TestWebConfigProvider::new(format!("127.0.0.1:{port}")),
        ))
        .unwrap();
    container
        .register::<ShutdownSignalSourcePtr>(ComponentInstancePtr::new(
            TestShutdownSignalSource {
                ready: Mutex::new(Some(ready_sender)),
            },
        ))
        .unwrap();
    casefold_web_axum::register_components(&mut container).unwrap();

    let application = application::create_default(container).unwrap();
    let handle = tokio::spawn(async move {
        application.run().await.unwrap();
    });

    let shutdown_sender = ready_receiver.await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{port}/test"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Hello world!");

    let response = client
        .post(format!("http://127.0.0.1:{port}/test"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "Posted!");

    let response = client
        .get(format!("http://127.0.0.1:{port}/other"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    drop(client);
    shutdown_sender.send(()).unwrap();
    handle.await.unwrap();
}

async fn run_until_failure(listen_address: String) -> ApplicationError {
    let mut container = ComponentContainer::new();
    container
        .register::<ControllerPtr>(ComponentInstancePtr::new(TestController))
        .unwrap();
    container
        .register::<WebConfigProviderPtr>(ComponentInstancePtr::new(TestWebConfigProvider::new(
            listen_address,
        )))
        .unwrap();
    casefold_web_axum::register_components(&mut container).unwrap();

    let application = application::create_default(container).unwrap();
    timeout(Duration::from_secs(5), application.run())
        .await
        .expect("application should fail instead of serving")
        .unwrap_err()
}

#[tokio::test]
async fn should_fail_on_occupied_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    match run_until_failure(format!("127.0.0.1:{port}")).await {
        ApplicationError::RunnerError(error) => assert!(matches!(
            error.downcast_ref::<ServerBootstrapError>(),
            Some(ServerBootstrapError::BindError(_))
        )),
        error => panic!("unexpected error: {error}"),
    }

    drop(listener);
}

#[tokio::test]
async fn should_fail_on_invalid_listen_address() {
    match run_until_failure("localhost:http".to_string()).await {
        ApplicationError::RunnerError(error) => assert!(matches!(
            error.downcast_ref::<ServerBootstrapError>(),
            Some(ServerBootstrapError::ListenAddressParseError(_))
        )),
        error => panic!("unexpected error: {error}"),
    }
}
