//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::WebConfig;
use crate::display::Presenter;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    backend: BackendClient,
    presenter: Presenter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client fails to build.
    pub fn new(config: WebConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        let presenter = Presenter::new(
            config.currency_symbol.clone(),
            config.backend.base_url.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                presenter,
            }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the record presenter.
    #[must_use]
    pub fn presenter(&self) -> &Presenter {
        &self.inner.presenter
    }
}
