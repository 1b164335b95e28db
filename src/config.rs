use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediConsult";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage key holding the JSON array of consultations.
pub const CONSULTATIONS_KEY: &str = "consultations";

/// Storage key written once the first-run bootstrap has completed.
pub const INITIALIZED_KEY: &str = "consultations_initialized";

/// Value stored under `INITIALIZED_KEY`.
pub const INITIALIZED_SENTINEL: &str = "true";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MEDICONSULT_DATA_DIR";

const DATABASE_FILE: &str = "mediconsult.db";

/// Get the application data directory.
/// `$MEDICONSULT_DATA_DIR` when set, otherwise ~/MediConsult/.
/// Falls back to the working directory when no home directory exists.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the SQLite file backing the key-value store.
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,mediconsult_lib=debug"
    } else {
        "info"
    }
}
