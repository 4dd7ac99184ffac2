use std::sync::Arc;

use crate::api_client::ApplicationsApi;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Records server. `HttpApplicationsClient` in production, a fake in tests.
    pub api: Arc<dyn ApplicationsApi>,
    pub config: Config,
}
