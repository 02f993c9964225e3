use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use saldo_advisor::{AdviceGateway, AdviceRequest, AdviceResponse, Advisor, LlmAdviceGateway};
use saldo_core::{demo_transactions, export_csv, summarize, Transaction, TransactionStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;
mod state;
mod window_arg;

#[derive(Parser, Debug)]
#[command(
    name = "saldo",
    version,
    about = "Personal income/expense tracker with AI budget advice"
)]
struct Cli {
    /// Start from an empty store instead of the demo month
    #[arg(long, global = true)]
    empty: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print transactions, most recent first
    List,

    /// Totals and expense breakdown for a date window (default: current month)
    Dashboard {
        /// Month as yyyy-mm
        #[arg(long, conflicts_with_all = ["from", "to", "all"])]
        month: Option<String>,

        /// Window start, yyyy-mm-dd (inclusive)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Window end, yyyy-mm-dd (inclusive)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Every transaction regardless of date
        #[arg(long)]
        all: bool,
    },

    /// Write transactions as CSV
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the configured model for budget advice
    Advise {
        /// Your financial goals, at least 10 characters
        #[arg(long)]
        goals: String,
    },

    /// Interactive session with add/edit/delete on the in-memory store
    Shell,

    /// Manage ~/.saldo/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn initial_store(empty: bool) -> TransactionStore {
    if empty {
        TransactionStore::new()
    } else {
        TransactionStore::with_transactions(demo_transactions())
    }
}

fn build_advisor(cfg: &config::Config) -> Result<Advisor<LlmAdviceGateway>> {
    let gateway = LlmAdviceGateway::new(cfg.advisor.llm_config()?)?;
    Ok(Advisor::new(gateway).with_time_period(cfg.advisor.time_period.clone()))
}

/// Check the request locally before `connect` builds a gateway, so missing
/// data is reported ahead of missing credentials.
async fn request_advice<G: AdviceGateway>(
    transactions: &[Transaction],
    goals: &str,
    cfg: &config::Config,
    connect: impl FnOnce(&config::Config) -> Result<Advisor<G>>,
) -> Result<AdviceResponse> {
    let request = AdviceRequest::from_transactions(transactions, goals, &cfg.advisor.time_period)
        .map_err(|e| {
            tracing::info!(error = %e, "advice request rejected");
            anyhow!(e.user_notice())
        })?;
    let advisor = connect(cfg)?;
    advisor
        .submit(request)
        .await
        .map_err(|e| anyhow!(e.user_notice()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = initial_store(cli.empty);

    match cli.command {
        Command::List => {
            print!("{}", render::transaction_table(store.list()));
        }

        Command::Dashboard {
            month,
            from,
            to,
            all,
        } => {
            let args: Vec<String> = match (month, from, to, all) {
                (_, _, _, true) => vec!["all".to_string()],
                (Some(m), _, _, _) => vec![m],
                (None, Some(f), Some(t), _) => vec![f, t],
                _ => vec![],
            };
            let window = window_arg::parse_window_args(&args)?;
            let summary = summarize(store.list(), &window);
            print!("{}", render::dashboard(&summary, &window));
        }

        Command::Export { out } => match out {
            Some(path) => {
                let file = std::fs::File::create(&path)?;
                export_csv(store.list(), file)?;
                eprintln!("Exported {} transactions to {}", store.len(), path.display());
            }
            None => export_csv(store.list(), std::io::stdout().lock())?,
        },

        Command::Advise { goals } => {
            let cfg = config::load_config()?;
            let advice = request_advice(store.list(), &goals, &cfg, build_advisor).await?;
            println!("## Analysis\n\n{}\n", advice.analysis);
            println!("## Suggestions\n");
            for s in &advice.suggestions {
                println!("- {s}");
            }
        }

        Command::Shell => {
            let cfg = config::load_config()?;
            let advisor = build_advisor(&cfg).map_err(|e| format!("{e:#}"));
            if let Err(reason) = &advisor {
                tracing::warn!(%reason, "advice disabled for this session");
            }
            let mut session = shell::Shell::new(store, advisor);
            session.run().await?;
            tracing::info!(transactions = session.store().len(), "session ended");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}
