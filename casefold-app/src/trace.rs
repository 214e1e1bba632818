use casefold::container::ErrorPtr;
use casefold_web_axum::axum::Router;
use casefold_web_axum::router::RouterConfigure;
use tower_http::trace::TraceLayer;

/// Wraps every route in a request tracing span.
pub struct RequestTraceRouterConfigure;

impl RouterConfigure for RequestTraceRouterConfigure {
    fn configure(&self, router: Router) -> Result<Router, ErrorPtr> {
        Ok(router.layer(TraceLayer::new_for_http()))
    }
}
