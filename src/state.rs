// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::narrative::TextGenerator;
use crate::storage::{DocumentStore, KeyLocks};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub locks: KeyLocks,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
        config: Config,
    ) -> Self {
        Self {
            store,
            generator,
            locks: KeyLocks::new(),
            config,
        }
    }
}
