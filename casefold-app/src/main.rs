use casefold::container::ComponentContainer;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    match casefold_app::run(ComponentContainer::new()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // failures before the application config is read happen without a logger
            let _ = tracing_subscriber::fmt().try_init();
            error!(%error, "Application terminated.");
            ExitCode::FAILURE
        }
    }
}
