use std::sync::Arc;

use crate::config::Config;
use crate::notifier::Notifier;
use crate::store::JsonStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    /// Mail sink chosen at startup: SMTP when configured, console logging otherwise.
    pub notifier: Notifier,
    pub config: Config,
}
