//! HTTP API: the presentation layer's window onto sessions

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::RuntimeManager;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(response_delay: Duration, idle_grace: Duration) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(response_delay, idle_grace)),
        }
    }
}
