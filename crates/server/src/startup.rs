//! Server startup: shared state initialization and background task spawning.

use std::sync::Arc;

use tracing::info;

use trickle_core::Config;

use crate::dispatch::{self, DispatcherHandle, SimulatedProcessor};
use crate::state::AppState;

/// Build the shared application state from config.
pub fn build_app_state(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config))
}

/// Spawn the dispatcher with the configured simulated processor.
pub fn spawn_background_tasks(state: Arc<AppState>) -> DispatcherHandle {
    let processor = Arc::new(SimulatedProcessor::new(state.config.ingest.process_delay()));
    info!(
        process_delay_ms = state.config.ingest.process_delay_ms,
        "Spawning dispatcher task"
    );
    dispatch::spawn_dispatcher(state, processor)
}
