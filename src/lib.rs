//! # Heliocal Engine
//!
//! Client-side core of a health calendar: turns the backend's flat record
//! lists (symptoms, medication intake, lab analyses) into the calendar's
//! event set, keeps that set consistent under asynchronous mutations,
//! expands repeating medication schedules, applies user filtering, and
//! tracks the daily geomagnetic (KP) index alongside.
//!
//! The pieces compose as a pipeline: [`store::CalendarStore`] holds the
//! records, [`projector`] and [`recurrence`] derive events from them,
//! [`classify`] resolves due/upcoming against the caller's clock at render
//! time, [`filter`] narrows the set, and
//! [`coordinator::MutationCoordinator`] is the only writer.

pub mod api;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod models;
pub mod projector;
pub mod recurrence;
pub mod store;

pub use api::http::HttpApi;
pub use api::HealthApi;
pub use config::Config;
pub use coordinator::MutationCoordinator;
pub use error::{EngineError, EngineResult};
pub use filter::{CategoryToggles, FilterCriteria};
pub use store::CalendarStore;

/// Wire up structured logging for embedding binaries. Honors `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heliocal_engine=debug".into()),
        )
        .json()
        .init();
}
