//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "pihole-keeper";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path prefix of the appliance REST API.
pub const API_PREFIX: &str = "/api";

/// Default timeout for light requests (login, logout, status), in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for long operations (teleporter export, gravity update), in seconds.
pub const LONG_TIMEOUT_SECS: u64 = 100;

/// Connect timeout applied to every request, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Backup directory used when none is configured.
pub const DEFAULT_BACKUP_DIR: &str = "backup";

/// Name of the log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "backup_upgrade.log";

/// Timestamp format used in backup file names. Sortable and filesystem-safe.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Sentinel file created and removed to probe write access.
pub const WRITE_PROBE_FILE: &str = ".write_test";

/// Environment variable names.
pub mod env {
    pub const PASSWORD: &str = "PASSWORD";
    pub const IP_LIST: &str = "IP_LIST";
    pub const PATH_TO_BACKUP: &str = "PATH_TO_BACKUP";
    pub const BASE_DIR: &str = "BASE_DIR";
}

/// Appliance endpoints, relative to [`API_PREFIX`].
pub mod endpoints {
    pub const AUTH: &str = "/auth";
    pub const TELEPORTER: &str = "/teleporter";
    pub const GRAVITY: &str = "/action/gravity";
    pub const VERSION: &str = "/info/version";
    pub const BLOCKING: &str = "/dns/blocking";
    pub const CONFIG: &str = "/config";
}
