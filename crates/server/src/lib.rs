//! trickle-server — HTTP surface and dispatcher for the ingestion service.
//!
//! The library exposes the router, shared state, and the dispatcher task
//! so integration tests can drive the full service in-process; the
//! `trickle-server` binary wires the same pieces to a TCP listener.

pub mod api;
pub mod dispatch;
pub mod router;
pub mod startup;
pub mod state;

pub use dispatch::{BatchProcessor, DispatcherHandle, SimulatedProcessor};
pub use router::build_router;
pub use startup::{build_app_state, spawn_background_tasks};
pub use state::AppState;
