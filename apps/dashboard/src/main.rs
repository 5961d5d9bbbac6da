use std::{
    io::{self, BufReader},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{HttpSubscriptionApi, SessionStore};
use shared::{
    domain::{SubscriptionFilter, SubscriptionId},
    protocol::{Credentials, SubscriptionForm},
};
use storage::Storage;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod ui;

use config::{load_settings, DEFAULT_LOG_FILTER};
use controller::{ClientController, UiEvent};
use ui::{AuthTab, TerminalPage, Templates};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Track recurring subscriptions from the terminal")]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:8080/api
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Where the session is kept between runs
    #[arg(long, global = true)]
    storage_url: Option<String>,
    /// Print the subscription list as HTML markup
    #[arg(long, global = true)]
    html: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in user, subscriptions and monthly cost
    Status,
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    List {
        /// Only active subscriptions
        #[arg(long)]
        active: bool,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "PLN")]
        currency: String,
        #[arg(long, default_value = "MONTHLY")]
        cycle: String,
        /// YYYY-MM-DD; defaults to today
        #[arg(long)]
        next_payment_date: Option<String>,
        #[arg(long)]
        no_auto_renewal: bool,
    },
    Cancel {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Cost,
}

impl Command {
    /// Events the command replays against the controller; empty for `status`.
    fn into_events(self) -> Vec<UiEvent> {
        let event = match self {
            Command::Status => return Vec::new(),
            Command::Register { email, password } => {
                return vec![
                    UiEvent::SwitchAuthTab(AuthTab::Register),
                    UiEvent::Register(Credentials::new(email, password)),
                ];
            }
            Command::Login { email, password } => {
                return vec![
                    UiEvent::SwitchAuthTab(AuthTab::Login),
                    UiEvent::Login(Credentials::new(email, password)),
                ];
            }
            Command::Logout => UiEvent::Logout,
            Command::List { active } => UiEvent::ShowSubscriptions(if active {
                SubscriptionFilter::Active
            } else {
                SubscriptionFilter::All
            }),
            Command::Add {
                name,
                price,
                currency,
                cycle,
                next_payment_date,
                no_auto_renewal,
            } => UiEvent::AddSubscription(SubscriptionForm {
                name,
                price,
                currency,
                billing_cycle: cycle,
                next_payment_date: next_payment_date
                    .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string()),
                auto_renewal: !no_auto_renewal,
            }),
            Command::Cancel { id, .. } => UiEvent::CancelSubscription(SubscriptionId(id)),
            Command::Cost => UiEvent::RefreshMonthlyCost,
        };
        vec![event]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = load_settings().with_overrides(args.api_base, args.storage_url);
    let storage_url = settings.normalized_storage_url();

    let storage = Storage::new(&storage_url).await.map_err(|err| {
        error!(%storage_url, "failed to open session storage: {err:#}");
        err
    })?;
    storage
        .health_check()
        .await
        .context("session storage is not usable")?;
    let api = HttpSubscriptionApi::new(settings.api_base.clone())
        .with_context(|| format!("invalid api base '{}'", settings.api_base))?;
    info!(api_base = %api.base_url(), %storage_url, "dashboard starting");

    let assume_yes = matches!(args.command, Command::Cancel { yes: true, .. });
    let page = TerminalPage::new(io::stdout(), BufReader::new(io::stdin()), assume_yes);
    let templates = if args.html {
        Templates::html()
    } else {
        Templates::text()
    }
    .context("failed to build list templates")?;
    let mut controller = ClientController::new(
        Arc::new(api),
        SessionStore::new(Arc::new(storage)),
        page,
        templates,
    );

    let events = args.command.into_events();
    if events.is_empty() {
        controller.start().await?;
    } else {
        controller.restore_session().await?;
        for event in events {
            controller.handle(event).await?;
        }
    }

    match controller.session() {
        Some(session) => debug!(email = session.email(), "dashboard: signed in on exit"),
        None => debug!("dashboard: signed out on exit"),
    }

    Ok(())
}
