// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "UserPanel";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "userpanel";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".userpanel";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "userpanel.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "USERPANEL_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "USERPANEL_DEBUG";

/// Environment variable for server host
pub const ENV_HOST: &str = "USERPANEL_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "USERPANEL_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "USERPANEL_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "USERPANEL_DATA_DIR";

/// Environment variable to force the panel on or off
pub const ENV_PANEL_ENABLED: &str = "USERPANEL_PANEL";

/// Environment variable for the attribute that plays the username role
pub const ENV_USERNAME_FIELD: &str = "USERPANEL_USERNAME_FIELD";

/// Environment variable for the panel mount prefix
pub const ENV_PANEL_PREFIX: &str = "USERPANEL_PREFIX";

/// Environment variable for the session signing secret
pub const ENV_SECRET_KEY: &str = "USERPANEL_SECRET_KEY";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Default log filter when neither USERPANEL_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,userpanel=info,userpanel_server=info";

// =============================================================================
// Panel
// =============================================================================

/// Mount point of the panel routes
pub const DEFAULT_PANEL_PREFIX: &str = "/__debug__/user";

/// Panel title and toolbar nav title
pub const PANEL_TITLE: &str = "User";

/// Name of the free-text lookup form field
pub const LOOKUP_FIELD_NAME: &str = "val";

/// Label of the free-text lookup form field
pub const LOOKUP_FIELD_LABEL: &str = "User.{id,username,email}";

/// Default number of recently active users listed by the panel
pub const DEFAULT_RECENT_USERS: u32 = 10;

/// Upper bound for the recent users list
pub const MAX_RECENT_USERS: u32 = 100;

/// Redirect target when a request carries no `next`
pub const DEFAULT_REDIRECT: &str = "/";

// =============================================================================
// Authentication
// =============================================================================

/// Cookie name for session token
pub const SESSION_COOKIE_NAME: &str = "userpanel_session";

/// Default session TTL in days
pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// Authentication method recorded in impersonated sessions
pub const AUTH_METHOD_IMPERSONATION: &str = "impersonation";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "userpanel.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// SQLite WAL auto-checkpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Body limit for panel form posts (64 KB)
pub const PANEL_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
