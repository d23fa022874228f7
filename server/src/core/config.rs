use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::UsernameField;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PANEL_PREFIX, DEFAULT_PORT,
    DEFAULT_RECENT_USERS, MAX_RECENT_USERS,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Session signing configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub secret_key: Option<String>,
}

/// User panel configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PanelFileConfig {
    pub enabled: Option<bool>,
    pub username_field: Option<UsernameField>,
    pub recent_users: Option<u32>,
    pub prefix: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub panel: Option<PanelFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Unknown top-level keys, in file order
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.secret_key.is_some() {
                tracing::trace!("Merging auth.secret_key");
                current.secret_key = auth.secret_key;
            }
        }

        if let Some(panel) = other.panel {
            let current = self.panel.get_or_insert_with(PanelFileConfig::default);
            if panel.enabled.is_some() {
                tracing::trace!(enabled = ?panel.enabled, "Merging panel.enabled");
                current.enabled = panel.enabled;
            }
            if panel.username_field.is_some() {
                tracing::trace!(field = ?panel.username_field, "Merging panel.username_field");
                current.username_field = panel.username_field;
            }
            if panel.recent_users.is_some() {
                tracing::trace!(count = ?panel.recent_users, "Merging panel.recent_users");
                current.recent_users = panel.recent_users;
            }
            if panel.prefix.is_some() {
                tracing::trace!(prefix = ?panel.prefix, "Merging panel.prefix");
                current.prefix = panel.prefix;
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Session signing configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Hex or raw secret; a random key is generated when absent
    pub secret_key: Option<String>,
}

/// User panel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub enabled: bool,
    pub username_field: UsernameField,
    pub recent_users: u32,
    pub prefix: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username_field: UsernameField::default(),
            recent_users: DEFAULT_RECENT_USERS,
            prefix: DEFAULT_PANEL_PREFIX.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub panel: PanelConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.userpanel/userpanel.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_panel = file_config.panel.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // debug: CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        // panel.enabled falls back to the general debug flag
        let panel = PanelConfig {
            enabled: cli.panel.or(file_panel.enabled).unwrap_or(debug),
            username_field: cli
                .username_field
                .or(file_panel.username_field)
                .unwrap_or_default(),
            recent_users: file_panel.recent_users.unwrap_or(DEFAULT_RECENT_USERS),
            prefix: cli
                .prefix
                .clone()
                .or(file_panel.prefix)
                .unwrap_or_else(|| DEFAULT_PANEL_PREFIX.to_string()),
        };

        let secret_key = cli
            .secret_key
            .clone()
            .or(file_auth.secret_key)
            .filter(|s| !s.trim().is_empty());

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig { secret_key },
            panel,
            debug,
        };
        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            debug = config.debug,
            panel_enabled = config.panel.enabled,
            username_field = %config.panel.username_field,
            prefix = %config.panel.prefix,
            "Configuration resolved"
        );
        config
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if !(1..=MAX_RECENT_USERS).contains(&self.panel.recent_users) {
            anyhow::bail!(
                "Configuration error: panel.recent_users must be between 1 and {} (got {})",
                MAX_RECENT_USERS,
                self.panel.recent_users
            );
        }

        let prefix = &self.panel.prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            anyhow::bail!(
                "Configuration error: panel.prefix must start with '/' and not end with '/' (got '{}')",
                prefix
            );
        }
        if let Some(c) = prefix
            .chars()
            .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-')))
        {
            anyhow::bail!(
                "Configuration error: panel.prefix may only contain letters, digits, '/', '_', '.' and '-' (found '{}' in '{}')",
                c,
                prefix
            );
        }

        if self.panel.enabled && !is_loopback(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "User panel enabled on a non-loopback address; anyone who can reach it can log in as any user"
            );
        }

        Ok(())
    }

    /// Whether the server binds to all network interfaces
    pub fn binds_all_interfaces(&self) -> bool {
        is_all_interfaces(&self.server.host)
    }
}

/// Get the profile config path (~/.userpanel/userpanel.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

fn is_loopback(host: &str) -> bool {
    matches!(host, "127.0.0.1" | "localhost" | "::1" | "[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_file_config_parse_full() {
        let config = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 8080 },
                "debug": true,
                "panel": { "enabled": false, "username_field": "email", "recent_users": 25, "prefix": "/dbg" },
                "auth": { "secret_key": "s3cret" }
            }"#,
        );

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));
        assert_eq!(config.debug, Some(true));

        let panel = config.panel.as_ref().unwrap();
        assert_eq!(panel.enabled, Some(false));
        assert_eq!(panel.username_field, Some(UsernameField::Email));
        assert_eq!(panel.recent_users, Some(25));
        assert_eq!(panel.prefix.as_deref(), Some("/dbg"));
        assert_eq!(
            config.auth.as_ref().unwrap().secret_key.as_deref(),
            Some("s3cret")
        );
        assert!(config.unknown_fields().is_empty());
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config = parse("{}");
        assert!(config.server.is_none());
        assert!(config.panel.is_none());
        assert!(config.debug.is_none());
    }

    #[test]
    fn test_file_config_unknown_fields() {
        let config = parse(r#"{ "debgu": true, "panel": {}, "extra": 1 }"#);
        assert_eq!(config.unknown_fields(), vec!["debgu", "extra"]);
    }

    #[test]
    fn test_file_config_invalid_username_field() {
        let result: Result<FileConfig, _> =
            serde_json::from_str(r#"{ "panel": { "username_field": "login" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = parse(
            r#"{ "server": { "host": "0.0.0.0", "port": 8080 }, "panel": { "recent_users": 5 } }"#,
        );
        base.merge(parse(
            r#"{ "server": { "port": 9090 }, "debug": true, "panel": { "prefix": "/u" } }"#,
        ));

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(9090));
        assert_eq!(base.debug, Some(true));
        let panel = base.panel.as_ref().unwrap();
        assert_eq!(panel.recent_users, Some(5));
        assert_eq!(panel.prefix.as_deref(), Some("/u"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(!config.debug);
        assert_eq!(config.panel, PanelConfig::default());
        assert!(config.auth.secret_key.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_panel_enabled_follows_debug() {
        let cli = CliConfig {
            debug: true,
            ..Default::default()
        };
        let config = AppConfig::from_layers(&cli, FileConfig::default());
        assert!(config.panel.enabled);

        let config = AppConfig::from_layers(&CliConfig::default(), parse(r#"{ "debug": true }"#));
        assert!(config.panel.enabled);
    }

    #[test]
    fn test_panel_enabled_explicit_overrides_debug() {
        let config = AppConfig::from_layers(
            &CliConfig::default(),
            parse(r#"{ "debug": true, "panel": { "enabled": false } }"#),
        );
        assert!(config.debug);
        assert!(!config.panel.enabled);

        let cli = CliConfig {
            panel: Some(true),
            ..Default::default()
        };
        let config = AppConfig::from_layers(&cli, FileConfig::default());
        assert!(!config.debug);
        assert!(config.panel.enabled);
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            port: Some(3000),
            username_field: Some(UsernameField::Email),
            prefix: Some("/cli".to_string()),
            secret_key: Some("from-cli".to_string()),
            ..Default::default()
        };
        let file = parse(
            r#"{
                "server": { "host": "file.host", "port": 8080 },
                "panel": { "username_field": "username", "prefix": "/file" },
                "auth": { "secret_key": "from-file" }
            }"#,
        );
        let config = AppConfig::from_layers(&cli, file);

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.panel.username_field, UsernameField::Email);
        assert_eq!(config.panel.prefix, "/cli");
        assert_eq!(config.auth.secret_key.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_blank_secret_key_ignored() {
        let config = AppConfig::from_layers(
            &CliConfig::default(),
            parse(r#"{ "auth": { "secret_key": "  " } }"#),
        );
        assert!(config.auth.secret_key.is_none());
    }

    #[test]
    fn test_validation_recent_users_range() {
        for bad in [0, MAX_RECENT_USERS + 1] {
            let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
            config.panel.recent_users = bad;
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.panel.recent_users = MAX_RECENT_USERS;
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_prefix() {
        for bad in [
            "__debug__/user",
            "/__debug__/user/",
            "/",
            "/dbg/{x",
            "/dbg/}",
            "/dbg/{*rest}",
            "/dbg/:id",
            "/dbg user",
        ] {
            let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
            config.panel.prefix = bad.to_string();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("panel.prefix"), "{bad}");
        }

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.panel.prefix = "/_debug-1.0/user".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_port_and_host() {
        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.server.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/userpanel.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{ "server": { "port": 7000 }, "panel": { "enabled": true } }"#,
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 7000);
        assert!(config.panel.enabled);
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
