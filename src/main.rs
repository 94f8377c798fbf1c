//! # Fidela — Client Retention CRM Engine
//!
//! Decides, once per day, which clients are due for an outreach message
//! (follow-up, birthday, re-engagement), generates idempotent tasks, and
//! dispatches them over WhatsApp with full audit logging.
//!
//! Usage:
//!   fidela serve                         # Daemon: daily scheduler loop
//!   fidela run                           # Manual generate+dispatch now
//!   fidela broadcast "Promoção!"         # Message every client, paced
//!   fidela client add "Ana" +5511...     # Operator CRUD
//!   fidela stats                         # Dashboard counters

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fidela_core::FidelaConfig;
use fidela_core::types::NewClient;
use fidela_engine::{broadcast, scheduler};
use fidela_store::Store;

#[derive(Parser)]
#[command(name = "fidela", version, about = "💛 Fidela — client retention outreach engine")]
struct Cli {
    /// Config file path (default: ~/.fidela/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the daemon: daily generate+dispatch at the configured time
    Serve,
    /// Run generate+dispatch once, now
    Run,
    /// Send one message to every client, with randomized pacing
    Broadcast {
        message: String,
        /// Image attachment reference (URL for the live channel)
        #[arg(long)]
        image: Option<String>,
    },
    /// Client records
    Client {
        #[command(subcommand)]
        cmd: ClientCmd,
    },
    /// Outreach tasks
    Task {
        #[command(subcommand)]
        cmd: TaskCmd,
    },
    /// Recent message log
    Log {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Dashboard counters
    Stats,
}

#[derive(Subcommand)]
enum ClientCmd {
    /// Add a client
    Add {
        name: String,
        phone: String,
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,
        /// Last appointment date, YYYY-MM-DD
        #[arg(long)]
        last_appointment: Option<String>,
        /// Last contacted date, YYYY-MM-DD (defaults to last appointment or today)
        #[arg(long)]
        last_contacted: Option<String>,
    },
    /// Replace a client's fields
    Edit {
        id: i64,
        name: String,
        phone: String,
        #[arg(long)]
        birth_date: Option<String>,
        #[arg(long)]
        last_appointment: Option<String>,
        #[arg(long)]
        last_contacted: Option<String>,
    },
    /// Delete clients (cascades to their tasks and log entries)
    Rm { ids: Vec<i64> },
    /// List all clients
    Ls,
}

#[derive(Subcommand)]
enum TaskCmd {
    /// List recent tasks
    Ls {
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Flip a task between done and pending
    Toggle { id: i64 },
    /// Force tasks to done
    Done { ids: Vec<i64> },
    /// Delete tasks
    Rm { ids: Vec<i64> },
}

fn parse_date_arg(value: &Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD)")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "fidela=debug,fidela_engine=debug,fidela_store=debug,fidela_channels=debug"
    } else {
        "fidela=info,fidela_engine=info,fidela_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => FidelaConfig::load_from(std::path::Path::new(path))?,
        None => FidelaConfig::load()?,
    };

    let db_path = shellexpand::tilde(&config.db_path).to_string();
    let store = Arc::new(Store::open(std::path::Path::new(&db_path))?);

    match cli.command {
        Command::Serve => {
            let sender = fidela_channels::from_config(&config.sender)?;
            println!("💛 Fidela v{}", env!("CARGO_PKG_VERSION"));
            println!("   🗄️  Database:  {db_path}");
            println!("   📨 Sender:    {}", sender.name());
            println!(
                "   ⏰ Daily run:  {:02}:{:02}",
                config.schedule.hour, config.schedule.minute
            );
            let handle = scheduler::spawn_daily(
                store,
                sender,
                config.schedule.hour,
                config.schedule.minute,
            );
            handle.await?;
        }
        Command::Run => {
            let sender = fidela_channels::from_config(&config.sender)?;
            let summary = scheduler::run_once(&store, sender.as_ref()).await?;
            println!(
                "✅ Run complete: {} generated, {} sent, {} failed",
                summary.generated, summary.dispatch.sent, summary.dispatch.failed
            );
        }
        Command::Broadcast { message, image } => {
            let sender = fidela_channels::from_config(&config.sender)?;
            let pacing = broadcast::Pacing {
                min_secs: config.broadcast.min_delay_secs,
                max_secs: config.broadcast.max_delay_secs,
            };
            // the CLI has nothing else to do, so wait for the report here;
            // other callers would keep the handle and stay unblocked
            let report = broadcast::spawn(store, sender, message, image, pacing)
                .wait()
                .await;
            println!("📣 Broadcast done: {} sent, {} failed", report.sent, report.failed);
        }
        Command::Client { cmd } => run_client_cmd(&store, cmd)?,
        Command::Task { cmd } => run_task_cmd(&store, cmd)?,
        Command::Log { limit } => {
            for entry in store.recent_log(limit)? {
                let marker = match entry.outcome {
                    fidela_core::types::LogOutcome::Sent => "✅",
                    fidela_core::types::LogOutcome::Failed => "❌",
                };
                println!(
                    "{} {} [{}] {} — {}{}",
                    marker,
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.kind,
                    entry.phone,
                    entry.message,
                    entry.error.map(|e| format!(" ({e})")).unwrap_or_default()
                );
            }
        }
        Command::Stats => {
            let stats = store.stats(Local::now().date_naive())?;
            println!("👥 Clients:         {}", stats.total_clients);
            println!("📋 Pending tasks:   {}", stats.pending_tasks);
            println!("🎂 Birthdays today: {}", stats.birthdays_today);
        }
    }

    Ok(())
}

fn run_client_cmd(store: &Store, cmd: ClientCmd) -> Result<()> {
    match cmd {
        ClientCmd::Add { name, phone, birth_date, last_appointment, last_contacted } => {
            let last_appointment = parse_date_arg(&last_appointment)?;
            let last_contacted = parse_date_arg(&last_contacted)?
                .or(last_appointment)
                .or_else(|| Some(Local::now().date_naive()));
            let new = NewClient {
                name,
                phone,
                birth_date: parse_date_arg(&birth_date)?,
                last_appointment,
                last_contacted,
            };
            match store.insert_client(&new) {
                Ok(id) => println!("✅ Client #{id} added"),
                Err(e) => tracing::warn!("client not added: {e}"),
            }
        }
        ClientCmd::Edit { id, name, phone, birth_date, last_appointment, last_contacted } => {
            let new = NewClient {
                name,
                phone,
                birth_date: parse_date_arg(&birth_date)?,
                last_appointment: parse_date_arg(&last_appointment)?,
                last_contacted: parse_date_arg(&last_contacted)?,
            };
            match store.update_client(id, &new) {
                Ok(()) => println!("✅ Client #{id} updated"),
                Err(e) => tracing::warn!("client not updated: {e}"),
            }
        }
        ClientCmd::Rm { ids } => {
            if !ids.is_empty() {
                store.delete_clients(&ids)?;
                println!("🗑️  Deleted {} client(s)", ids.len());
            }
        }
        ClientCmd::Ls => {
            for client in store.list_clients()? {
                println!(
                    "#{:<4} {:<24} {:<18} aniversário: {}  último corte: {}  contato: {}",
                    client.id,
                    client.name,
                    client.phone,
                    fmt_opt_date(client.birth_date),
                    fmt_opt_date(client.last_appointment),
                    fmt_opt_date(client.last_contacted),
                );
            }
        }
    }
    Ok(())
}

fn run_task_cmd(store: &Store, cmd: TaskCmd) -> Result<()> {
    match cmd {
        TaskCmd::Ls { limit } => {
            for task in store.list_tasks(limit)? {
                println!(
                    "#{:<4} client {:<4} [{}] {:<7} {} — {}",
                    task.id,
                    task.client_id,
                    task.kind.as_str(),
                    task.status.as_str(),
                    task.scheduled_for,
                    task.message,
                );
            }
        }
        TaskCmd::Toggle { id } => match store.toggle_task(id)? {
            Some(status) => println!("✅ Task #{id} → {}", status.as_str()),
            None => println!("⚠️  Task #{id} not found"),
        },
        TaskCmd::Done { ids } => {
            if !ids.is_empty() {
                store.mark_tasks_done(&ids)?;
                println!("✅ Marked {} task(s) done", ids.len());
            }
        }
        TaskCmd::Rm { ids } => {
            if !ids.is_empty() {
                store.delete_tasks(&ids)?;
                println!("🗑️  Deleted {} task(s)", ids.len());
            }
        }
    }
    Ok(())
}

fn fmt_opt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "—".into())
}
