//! Application state shared across handlers.

use std::sync::Arc;

use crate::database::DocumentStore;
use crate::services::{PaymentProcessor, TokenService};

/// Read-only after startup; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    tokens: TokenService,
    store: Arc<dyn DocumentStore>,
    processor: Arc<dyn PaymentProcessor>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        store: Arc<dyn DocumentStore>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner { tokens, store, processor }),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    pub fn processor(&self) -> &dyn PaymentProcessor {
        self.inner.processor.as_ref()
    }
}
