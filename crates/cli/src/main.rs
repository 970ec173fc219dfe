//! Cartwheel CLI - order-processing API client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cartwheel products list
//!
//! # Place an order
//! cartwheel orders create --item SKU-1:2 --item SKU-9:1 --coupon SAVE10
//!
//! # Inspect and page through order history
//! cartwheel orders get ord-42
//! cartwheel orders list --page-size 20 --after <cursor>
//!
//! # Check a coupon without spending it
//! cartwheel coupons validate SAVE10
//!
//! # Session management
//! cartwheel auth status
//! cartwheel auth logout
//! ```
//!
//! Configuration comes from the environment; see `cartwheel_client::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output belongs on stdout, startup failures on stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cartwheel_client::auth::{AuthSessionStore, StaticTokenProvider};
use cartwheel_client::config::ClientConfig;
use cartwheel_client::http::{
    ApiClient, AuthHeaderInterceptor, ErrorNotifierHook, ForcedLogoutHook, Navigator,
    SessionHeaderInterceptor, TraceContextInterceptor,
};
use cartwheel_client::notify::ErrorNotifications;
use cartwheel_client::services::OrderService;
use cartwheel_client::session::{MemoryStorage, SessionId};
use cartwheel_client::telemetry::TelemetryConfig;

mod commands;

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Order-processing API client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Create and inspect orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Validate coupons
    Coupons {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Inspect or end the current session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Create an order from one or more items
    Create {
        /// Order line as `SKU:QTY`, repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Coupon code to apply
        #[arg(short, long)]
        coupon: Option<String>,
    },
    /// Fetch one order by id
    Get {
        /// Order id
        id: String,
    },
    /// List order history, newest first
    List {
        /// Rows per page
        #[arg(short, long)]
        page_size: Option<u32>,

        /// Cursor from the previous page
        #[arg(short, long)]
        after: Option<String>,
    },
}

#[derive(Subcommand)]
enum CouponAction {
    /// Check a coupon without consuming it
    Validate {
        /// Coupon code
        code: String,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Show the current session
    Status,
    /// Sign out and clear the local session
    Logout,
}

/// Points the user at the login route when the backend rejects the session.
struct LoginPrompt {
    login_url: String,
}

impl Navigator for LoginPrompt {
    fn redirect_to_login(&self) {
        tracing::warn!("session expired; sign in again at {}", self.login_url);
    }
}

/// The wired-up object graph a command runs against.
struct App {
    auth: AuthSessionStore,
    service: OrderService,
}

fn wire(config: &ClientConfig) -> Result<App, Box<dyn std::error::Error>> {
    let auth = AuthSessionStore::new(Arc::new(StaticTokenProvider::new(
        config
            .api_token
            .clone()
            .unwrap_or_else(|| secrecy::SecretString::from("")),
        config.identity.clone(),
    )));

    let storage = MemoryStorage::new();
    let session_id = SessionId::load_or_generate(&storage);
    let notifications = ErrorNotifications::new();
    let navigator = Arc::new(LoginPrompt {
        login_url: config.login_url.clone(),
    });

    let client = ApiClient::builder(config.api_url.clone())
        .timeout(config.request_timeout)
        .request_interceptor(AuthHeaderInterceptor::new(auth.clone()))
        .request_interceptor(SessionHeaderInterceptor::new(session_id))
        .request_interceptor(TraceContextInterceptor)
        .failure_hook(ForcedLogoutHook::new(auth.clone(), navigator))
        .failure_hook(ErrorNotifierHook::new(notifications))
        .build()?;

    Ok(App {
        auth,
        service: OrderService::new(client),
    })
}

#[tokio::main]
async fn main() {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let mut telemetry = TelemetryConfig::new(config.service_name.clone());
    if let Some(otlp) = config.otlp.clone() {
        telemetry = telemetry.with_otlp(otlp);
    }
    let guard = telemetry.init();

    let cli = Cli::parse();
    let result = run(cli, &config).await;
    guard.flush().await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = wire(config)?;

    // A configured token means a live session; resolve it before any call.
    if config.api_token.is_some() {
        app.auth.check_auth().await;
    }

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&app.service).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::Create { items, coupon } => {
                commands::orders::create(&app.service, &items, coupon.as_deref()).await?;
            }
            OrderAction::Get { id } => commands::orders::get(&app.service, &id).await?,
            OrderAction::List { page_size, after } => {
                commands::orders::list(&app.service, page_size, after).await?;
            }
        },
        Commands::Coupons { action } => match action {
            CouponAction::Validate { code } => {
                commands::coupons::validate(&app.service, &code).await?;
            }
        },
        Commands::Auth { action } => match action {
            AuthAction::Status => commands::auth::status(&app.auth),
            AuthAction::Logout => commands::auth::logout(&app.auth).await,
        },
    }
    Ok(())
}
