use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    DEFAULT_RECENT_USERS, ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PANEL_ENABLED, ENV_PANEL_PREFIX,
    ENV_PORT, ENV_SECRET_KEY, ENV_USERNAME_FIELD,
};
use crate::domain::UsernameField;

#[derive(Parser)]
#[command(name = "userpanel")]
#[command(version, about = "Debug panel for impersonating users", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (turns the panel on unless panel.enabled says otherwise)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Force the user panel on or off
    #[arg(long, global = true, env = ENV_PANEL_ENABLED)]
    pub panel: Option<bool>,

    /// User attribute that plays the username role (username or email)
    #[arg(long, global = true, env = ENV_USERNAME_FIELD, value_parser = parse_username_field)]
    pub username_field: Option<UsernameField>,

    /// Mount prefix of the panel routes
    #[arg(long, global = true, env = ENV_PANEL_PREFIX)]
    pub prefix: Option<String>,

    /// Session signing secret (hex or raw string)
    #[arg(long, global = true, env = ENV_SECRET_KEY, hide_env_values = true)]
    pub secret_key: Option<String>,
}

/// Parse username field from CLI/env string
fn parse_username_field(s: &str) -> Result<UsernameField, String> {
    match s.to_lowercase().as_str() {
        "username" => Ok(UsernameField::Username),
        "email" => Ok(UsernameField::Email),
        _ => Err(format!(
            "Invalid username field '{}'. Valid options: username, email",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Manage users in the local store
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// Add a user that can only be logged in through the panel
    Add(AddUserArgs),
    /// List the most recently active users
    List {
        /// Number of users to show
        #[arg(long, short = 'n', default_value_t = DEFAULT_RECENT_USERS)]
        limit: u32,
    },
}

#[derive(Args, Clone, Debug)]
pub struct AddUserArgs {
    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Username (must be unique)
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Mark the user as staff
    #[arg(long)]
    pub staff: bool,

    /// Mark the user as superuser
    #[arg(long)]
    pub superuser: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub panel: Option<bool>,
    pub username_field: Option<UsernameField>,
    pub prefix: Option<String>,
    pub secret_key: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        panel: cli.panel,
        username_field: cli.username_field,
        prefix: cli.prefix,
        secret_key: cli.secret_key,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_username_field() {
        assert_eq!(
            parse_username_field("EMAIL").unwrap(),
            UsernameField::Email
        );
        assert_eq!(
            parse_username_field("username").unwrap(),
            UsernameField::Username
        );
        assert!(parse_username_field("login").is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "userpanel",
            "--port",
            "8000",
            "--panel",
            "false",
            "--username-field",
            "email",
            "--prefix",
            "/debug/user",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, Some(8000));
        assert_eq!(cli.panel, Some(false));
        assert_eq!(cli.username_field, Some(UsernameField::Email));
        assert_eq!(cli.prefix.as_deref(), Some("/debug/user"));
    }

    #[test]
    fn test_cli_user_add() {
        let cli = Cli::try_parse_from([
            "userpanel",
            "user",
            "add",
            "--email",
            "bob@example.com",
            "--username",
            "bob",
            "--staff",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::User {
                command: UserCommands::Add(args),
            }) => {
                assert_eq!(args.email.as_deref(), Some("bob@example.com"));
                assert_eq!(args.username.as_deref(), Some("bob"));
                assert!(args.staff);
                assert!(!args.superuser);
                assert_eq!(args.first_name, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_user_list_default_limit() {
        let cli = Cli::try_parse_from(["userpanel", "user", "list"]).unwrap();
        match cli.command {
            Some(Commands::User {
                command: UserCommands::List { limit },
            }) => assert_eq!(limit, DEFAULT_RECENT_USERS),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
