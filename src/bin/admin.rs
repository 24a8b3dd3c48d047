//! CLI administration tool for blog-backend.
//!
//! Inspects table sizes against the retention policy and runs manual
//! evictions without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Row counts of every table against the threshold
//! cargo run --bin admin -- retention status
//!
//! # Evict the oldest batch from a table
//! cargo run --bin admin -- retention evict articles
//!
//! # Evict a custom batch without confirmation
//! cargo run --bin admin -- retention evict articles --batch 100 -y
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`: PostgreSQL connection
//! - `RETENTION_THRESHOLD`, `RETENTION_BATCH_SIZE`: policy used for status and defaults
//!
//! A running server keeps its own in-memory counters. Evicting here does not
//! reset them; the server catches up at its next threshold crossing or restart.

use blog_backend::config::{Config, mask_connection_string};
use blog_backend::domain::repositories::RetentionRepository;
use blog_backend::domain::retention::{Evictor, RetentionPolicy};
use blog_backend::infrastructure::persistence::PgRetentionRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing blog-backend.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and run record eviction
    Retention {
        #[command(subcommand)]
        action: RetentionAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Retention subcommands.
#[derive(Subcommand)]
enum RetentionAction {
    /// Show row counts of every table against the threshold
    Status,

    /// Delete the oldest batch of rows from a table
    Evict {
        /// Table to evict from
        table: String,

        /// Rows to delete (defaults to RETENTION_BATCH_SIZE)
        #[arg(short, long)]
        batch: Option<u64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url).await.with_context(|| {
        format!(
            "Failed to connect to {}",
            mask_connection_string(&database_url)
        )
    })?;

    match cli.command {
        Commands::Retention { action } => handle_retention_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches retention commands.
async fn handle_retention_action(action: RetentionAction, pool: &PgPool) -> Result<()> {
    let policy = Config::load_retention_policy()?;
    let repo: Arc<dyn RetentionRepository> =
        Arc::new(PgRetentionRepository::new(Arc::new(pool.clone())));

    match action {
        RetentionAction::Status => show_status(repo.as_ref(), policy).await?,
        RetentionAction::Evict { table, batch, yes } => {
            evict(repo, &table, batch.unwrap_or(policy.batch_size()), yes).await?;
        }
    }

    Ok(())
}

/// Lists every table with its row count.
///
/// # Output Format
///
/// ```text
/// 🗄️  Retention Status (threshold 500, batch 250)
///
///   Table                Rows       Status
///   ──────────────────────────────────────────────
///   articles             312        OK
///   users                517        OVER
/// ```
async fn show_status(repo: &dyn RetentionRepository, policy: RetentionPolicy) -> Result<()> {
    println!(
        "{} (threshold {}, batch {})",
        "🗄️  Retention Status".bright_blue().bold(),
        policy.threshold(),
        policy.batch_size()
    );
    println!();

    let tables = repo
        .list_tables()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tables: {}", e))?;

    if tables.is_empty() {
        println!("{}", "  No tables found".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<10} {:<10}",
        "Table".bright_white().bold(),
        "Rows".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(46).bright_black());

    for table in &tables {
        match repo.count(table).await {
            Ok(rows) => {
                let status = if policy.is_over(rows) {
                    "OVER".red()
                } else {
                    "OK".green()
                };
                println!("  {:<20} {:<10} {}", table.cyan(), rows, status);
            }
            Err(e) => {
                println!("  {:<20} {:<10} {}", table.cyan(), "?", e.to_string().red());
            }
        }
    }

    println!();

    Ok(())
}

/// Deletes one batch of the oldest rows with a confirmation prompt.
async fn evict(
    repo: Arc<dyn RetentionRepository>,
    table: &str,
    batch_size: u64,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🧹 Evict Oldest Rows".bright_blue().bold());
    println!();

    let tables = repo
        .list_tables()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tables: {}", e))?;

    if !tables.iter().any(|t| t == table) {
        anyhow::bail!("Unknown table '{}'", table);
    }

    println!("  Table: {}", table.cyan());
    println!("  Rows:  {}", batch_size.to_string().bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these rows?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = Evictor::new(repo)
        .evict_oldest(table, batch_size)
        .await
        .map_err(|e| anyhow::anyhow!("Eviction failed: {}", e))?;

    println!(
        "{} {}",
        "✅ Rows deleted:".green().bold(),
        removed.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
