mod commands;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{add, delete, edit, list};
use dialoguer::{theme::ColorfulTheme, Confirm};
use persistence::repositories::{ContactRepository, ContactStore};
use persistence::PersistenceError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "contacts", author, version, about = "Contacts address book")]
#[command(arg_required_else_help(true))]
struct Cli {
    /// Log database activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "List all contacts")]
    List,
    #[command(about = "Add a contact")]
    Add(add::AddArgs),
    #[command(about = "Change a contact's name and email")]
    Edit(edit::EditArgs),
    #[command(about = "Delete a contact")]
    Delete(delete::DeleteArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PersistenceError>() {
                Some(db_err) if db_err.is_connection() => {
                    eprintln!("Database connection failed: {}", db_err);
                    eprintln!(
                        "Check the connection settings (PG_HOST, PG_PORT, PG_DB, PG_USER, PG_PASSWORD)."
                    );
                }
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let db_config = settings::load_database_config().context("failed to load configuration")?;
    let pool = persistence::db::create_pool(&db_config).await?;
    let store = ContactRepository::new(pool.clone());
    store.ensure_schema().await?;

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::List => list::cmd(&store, &mut stdout).await,
        Commands::Add(args) => add::cmd(&store, args, &mut stdout).await,
        Commands::Edit(args) => edit::cmd(&store, args, &mut stdout).await,
        Commands::Delete(args) => delete::cmd(&store, args, &mut stdout, confirm_delete).await,
    };

    pool.close().await;
    result
}

fn confirm_delete(id: i32) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete contact {}?", id))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
