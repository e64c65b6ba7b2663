//! Dokan CLI - shop client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Start a session
//! dokan auth login -e sara@example.ir -p '...'
//!
//! # Fill the cart
//! dokan cart add -i p1 -n "Tea Glass" --price 250000 -q 2 --color red
//! dokan cart show
//!
//! # Moderate comments (admin accounts)
//! dokan comments list --status pending
//! dokan comments approve 65f1c0...
//!
//! # Sales reports
//! dokan reports stats --from 2025-03-01 --to 2025-03-31 --period weekly
//! dokan reports export pdf
//! ```
//!
//! # Commands
//!
//! - `auth` - login, register, logout, whoami, update
//! - `cart` - add, remove, update, clear, show
//! - `comments` - moderation queue, bulk actions, analytics, export
//! - `reports` - sales analytics, statistics, export

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod app;
mod commands;
mod error;

use clap::{Parser, Subcommand};
use dokan_admin::AdminConfig;
use dokan_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use commands::{AuthCommand, CartCommand, CommentsCommand, ReportsCommand};
use error::CliError;

#[derive(Parser)]
#[command(name = "dokan")]
#[command(author, version, about = "Dokan shop client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Moderate product comments
    Comments {
        #[command(subcommand)]
        action: CommentsCommand,
    },
    /// Sales reports
    Reports {
        #[command(subcommand)]
        action: ReportsCommand,
    },
}

/// Initialize Sentry error tracking and return the guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dokan=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        if e.is_reportable() {
            tracing::error!(error = %e, "Command failed");
        } else {
            tracing::info!(error = %e, "Command rejected");
        }
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let admin_config = AdminConfig::from_env()?;
    let app = App::build(config, &admin_config)?;

    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(&app, action).await,
        Commands::Cart { action } => commands::cart::run(&app, action),
        Commands::Comments { action } => commands::comments::run(&app, action).await,
        Commands::Reports { action } => commands::reports::run(&app, action).await,
    };

    app.print_toasts();
    result
}
