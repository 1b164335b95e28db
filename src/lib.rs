pub mod commands;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod schedule;
pub mod seed;
pub mod store;
pub mod views;

pub use core_state::{CoreError, CoreState};
pub use models::{Consultation, ConsultationCategory, ConsultationInput};
pub use store::{ConsultationStore, StoreError};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `config::default_log_filter()`.
/// Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
