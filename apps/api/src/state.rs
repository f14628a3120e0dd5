use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::notify::Notifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable notification sink. Default: PgNotifier (persists rows for an
    /// external delivery worker). Swappable in tests.
    pub notifier: Arc<dyn Notifier>,
}
