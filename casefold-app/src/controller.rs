//! HTTP routes converting the case of the `value` query parameter.

use crate::service::CaseServicePtr;
use casefold::container::{
    ComponentContainer, ComponentContainerError, ComponentInstancePtr, ErrorPtr,
};
use casefold_web_axum::axum::extract::{Query, State};
use casefold_web_axum::axum::http::StatusCode;
use casefold_web_axum::axum::routing::any;
use casefold_web_axum::axum::Router;
use casefold_web_axum::controller::Controller;
use tracing::debug;

/// Response body for requests without the `value` parameter.
pub const MISSING_VALUE_MESSAGE: &str = "Value not specified";

/// Query parameter holding the text to convert.
pub const VALUE_PARAM: &str = "value";

// raw pairs, so repeated or unexpected parameters never reject the request
type QueryParams = Vec<(String, String)>;

/// Exposes [CaseService](crate::service::CaseService) operations under `/upperCase` and
/// `/lowerCase`. Both routes match every HTTP method.
pub struct CaseController {
    service: ComponentInstancePtr<CaseServicePtr>,
}

impl CaseController {
    pub fn new(service: ComponentInstancePtr<CaseServicePtr>) -> Self {
        Self { service }
    }

    pub fn from_container(
        container: &ComponentContainer,
    ) -> Result<Self, ComponentContainerError> {
        container.primary_instance().map(Self::new)
    }
}

impl Controller for CaseController {
    fn configure_router(&self, router: Router) -> Result<Router, ErrorPtr> {
        Ok(router.merge(
            Router::new()
                .route("/upperCase", any(upper_case))
                .route("/lowerCase", any(lower_case))
                .with_state(self.service.clone()),
        ))
    }
}

async fn upper_case(
    State(service): State<ComponentInstancePtr<CaseServicePtr>>,
    Query(params): Query<QueryParams>,
) -> (StatusCode, String) {
    convert(value_param(params), |value| service.upper(value))
}

async fn lower_case(
    State(service): State<ComponentInstancePtr<CaseServicePtr>>,
    Query(params): Query<QueryParams>,
) -> (StatusCode, String) {
    convert(value_param(params), |value| service.lower(value))
}

/// First `value` parameter, if any. Later repetitions are ignored.
fn value_param(params: QueryParams) -> Option<String> {
    params
        .into_iter()
        .find_map(|(name, value)| (name == VALUE_PARAM).then_some(value))
}

fn convert(
    value: Option<String>,
    conversion: impl FnOnce(&str) -> String,
) -> (StatusCode, String) {
    match value {
        Some(value) => (StatusCode::OK, conversion(&value)),
        None => {
            debug!("Missing value parameter.");
            (StatusCode::BAD_REQUEST, MISSING_VALUE_MESSAGE.to_string())
        }
    }
}
