#![forbid(unsafe_code)]

//! `riftswitch` — account-aware session launcher binary.
//!
//! Thin CLI over the launch orchestrator: one launch action with a
//! conflict confirmation prompt, a running/not-running status display,
//! and account bookkeeping.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use riftswitch::config::GlobalConfig;
use riftswitch::launcher::handoff::EnigoInjector;
use riftswitch::launcher::RiotLauncher;
use riftswitch::models::account::{Account, GameAffinity, GameKind};
use riftswitch::models::request::{CloseScope, LaunchRequest};
use riftswitch::models::status::GameStatus;
use riftswitch::orchestrator::status_monitor::spawn_status_monitor;
use riftswitch::orchestrator::{FlightRegistry, LaunchOrchestrator, LaunchOutcome, LastLoginSink};
use riftswitch::process::{ProcessProbe, SystemProbe, SystemTerminator};
use riftswitch::store::{secrets, AccountStore};
use riftswitch::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "riftswitch", about = "Account-aware session launcher for Riot titles", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch a game under a stored account.
    Launch {
        /// Account id to launch with.
        #[arg(long)]
        account: String,
        /// Which title to launch.
        #[arg(long, value_enum)]
        game: GameKind,
        /// On conflict, close every running managed game, not just the target.
        #[arg(long)]
        close_all: bool,
        /// Skip the conflict confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show which managed games are currently running.
    Status {
        /// Keep refreshing on the background poll interval.
        #[arg(long)]
        watch: bool,
    },
    /// Manage stored accounts.
    #[command(subcommand)]
    Accounts(AccountsCommand),
}

#[derive(Debug, Subcommand)]
enum AccountsCommand {
    /// List stored accounts.
    List,
    /// Add an account. The password goes to the OS keychain when one is
    /// available; otherwise it stays in the account store.
    Add {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Riot login username.
        #[arg(long)]
        username: String,
        /// Riot login password.
        #[arg(long)]
        password: String,
        /// Optional contact email.
        #[arg(long)]
        email: Option<String>,
        /// Free-form grouping label.
        #[arg(long, default_value = "")]
        category: String,
        /// Which titles the account is for.
        #[arg(long, value_enum, default_value_t = GameAffinity::Both)]
        game: GameAffinity,
    },
    /// Remove an account and its keychain entry.
    Remove {
        /// Account id to remove.
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
    }
}

async fn run(args: Cli) -> Result<()> {
    let config = GlobalConfig::load_from_path(&args.config)?;
    let store = Arc::new(AccountStore::load(config.accounts_path())?);

    match args.command {
        Commands::Launch {
            account,
            game,
            close_all,
            yes,
        } => launch(&config, store, &account, game, close_all, yes).await,
        Commands::Status { watch } => status(&config, watch).await,
        Commands::Accounts(command) => accounts(&store, command).await,
    }
}

async fn launch(
    config: &GlobalConfig,
    store: Arc<AccountStore>,
    account_id: &str,
    game: GameKind,
    close_all: bool,
    yes: bool,
) -> Result<()> {
    let mut account = store.get(account_id)?;
    account.password = secrets::resolve_password(&account).await?;

    let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe::new());
    let sink: Arc<dyn LastLoginSink> = store;
    let orchestrator = LaunchOrchestrator::new(
        Arc::clone(&probe),
        Arc::new(SystemTerminator::new()),
        Arc::new(RiotLauncher::new(
            Arc::clone(&probe),
            Arc::new(EnigoInjector::new()),
        )),
        sink,
    );

    let startup = config.startup();
    let quiet = startup.minimize_on_launch;
    let request = LaunchRequest {
        account,
        kind: game,
    };

    info!(%game, "launch requested");
    let receipt = match orchestrator.request_launch(request, startup).await? {
        LaunchOutcome::Completed(receipt) => receipt,
        LaunchOutcome::Conflicted { running, token } => {
            let proceed = yes || confirm_close(&running).await?;
            if !proceed {
                // Dropping the token abandons the run with nothing closed.
                println!("Launch cancelled; nothing was closed.");
                return Ok(());
            }
            let scope = if close_all {
                CloseScope::All
            } else {
                CloseScope::TargetOnly
            };
            orchestrator.resume_launch(token, scope).await?
        }
    };

    println!(
        "{} launched ({})",
        receipt.kind,
        receipt.completed_at.to_rfc3339()
    );

    if !quiet {
        if let Ok(snapshot) = probe.probe().await {
            print_status(snapshot);
        }
    }
    Ok(())
}

async fn confirm_close(running: &[GameKind]) -> Result<bool> {
    let names: Vec<&str> = running.iter().map(|kind| kind.as_str()).collect();
    println!("Currently running: {}.", names.join(", "));
    print!("Close and continue with the launch? [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn status(config: &GlobalConfig, watch: bool) -> Result<()> {
    let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe::new());

    if !watch {
        print_status(probe.probe().await?);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let (mut updates, handle) = spawn_status_monitor(
        probe,
        FlightRegistry::new(),
        config.status_poll_interval(),
        cancel.clone(),
    );

    println!(
        "Watching (every {}s); Ctrl-C to stop.",
        config.status_poll_interval().as_secs()
    );
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_status(*updates.borrow());
            }
        }
    }

    cancel.cancel();
    let _ = handle.await;
    Ok(())
}

fn print_status(status: GameStatus) {
    for kind in GameKind::ALL {
        let state = if status.is_running(kind) {
            "running"
        } else {
            "not running"
        };
        println!("{kind:>8}: {state}");
    }
}

async fn accounts(store: &AccountStore, command: AccountsCommand) -> Result<()> {
    match command {
        AccountsCommand::List => {
            for account in store.list()? {
                let last_login = account
                    .last_login
                    .map_or_else(|| "never".to_owned(), |ts| ts.to_rfc3339());
                println!(
                    "{}  {}  [{}]  last login: {last_login}",
                    account.id, account.name, account.category
                );
            }
        }
        AccountsCommand::Add {
            name,
            username,
            password,
            email,
            category,
            game,
        } => {
            let mut account = Account::new(name, username, password.clone(), category, game);
            account.email = email;

            if secrets::store_password(&account.id, &password).await? {
                account.password.clear();
            }
            let id = account.id.clone();
            store.upsert(account)?;
            println!("Added account {id}");
        }
        AccountsCommand::Remove { id } => {
            store.remove(&id)?;
            secrets::delete_password(&id).await;
            println!("Removed account {id}");
        }
    }
    Ok(())
}
