//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiServer, SessionManager};
use crate::core::banner;
use crate::core::cli::{self, AddUserArgs, CliConfig, Commands, UserCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG, MAX_RECENT_USERS};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::{NewUser, UserDirectory, UserRow};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub directory: UserDirectory,
    pub sessions: Arc<SessionManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;

        match command {
            Some(Commands::User { command }) => {
                let result = app.handle_user_command(command).await;
                app.directory.close().await;
                result
            }
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;
        let directory = UserDirectory::init(&storage).await?;
        let sessions = Arc::new(SessionManager::from_config(&config.auth)?);
        let shutdown = ShutdownService::new(directory.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            directory,
            sessions,
        })
    }

    async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Add(args) => self.add_user(args).await,
            UserCommands::List { limit } => self.list_users(limit).await,
        }
    }

    async fn add_user(&self, args: AddUserArgs) -> Result<()> {
        if args.email.is_none() && args.username.is_none() {
            anyhow::bail!("A user needs at least an --email or a --username");
        }

        let user = self
            .directory
            .repository()
            .create_user(&NewUser {
                username: args.username,
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                is_staff: args.staff,
                is_superuser: args.superuser,
            })
            .await?;

        println!("Created user #{} ({})", user.id, user.label());
        Ok(())
    }

    async fn list_users(&self, limit: u32) -> Result<()> {
        let limit = limit.clamp(1, MAX_RECENT_USERS);
        let users = self.directory.repository().list_recent_users(limit).await?;

        if users.is_empty() {
            println!("No users yet. Add one with `user add --email <EMAIL>`.");
            return Ok(());
        }

        println!("{:>6}  {:<24} {:<32} LAST LOGIN", "ID", "USERNAME", "EMAIL");
        for user in &users {
            println!("{}", format_user_line(user));
        }
        Ok(())
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(
                app.directory
                    .start_checkpoint_task(app.shutdown.subscribe()),
            )
            .await;

        banner::print_banner(&app.config, &app.storage.data_dir().display().to_string());

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}

fn format_user_line(user: &UserRow) -> String {
    let last_login = user
        .last_login
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "{:>6}  {:<24} {:<32} {}",
        user.id,
        user.username.as_deref().unwrap_or("-"),
        user.email.as_deref().unwrap_or("-"),
        last_login
    )
}
