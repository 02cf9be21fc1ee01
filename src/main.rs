use anyhow::Context;
use clap::{Parser, Subcommand};
use mantha_review::export::json::{export_json_to_path, import_json};
use mantha_review::models::scheduler::format_interval;
use mantha_review::*;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Spaced-repetition review scheduling for Mantha learning topics.
#[derive(Debug, Parser)]
#[command(name = "mantha-review", version)]
struct Cli {
    /// SQLite database file (overrides MANTHA_REVIEW_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON config file applied before environment overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a topic for a learner. Existing topics are left unchanged.
    Add {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        title: String,
    },
    /// Record one review outcome (pass or fail).
    Review {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        outcome: ReviewOutcome,
    },
    /// Show topics that are due now.
    Due {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show every topic of a learner.
    List {
        #[arg(long)]
        owner: String,
    },
    /// Summarize a learner's review pool.
    Stats {
        #[arg(long)]
        owner: String,
    },
    /// Review due topics interactively, answering y/n on stdin.
    Study {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write a learner's topics to a JSON file.
    Export {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        output: PathBuf,
    },
    /// Restore topics from a JSON export.
    Import {
        #[arg(long)]
        input: PathBuf,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<ReviewConfig> {
    let base = match &cli.config {
        Some(path) => ReviewConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ReviewConfig::default(),
    };
    let mut config = base.with_overrides(|key| std::env::var(key).ok())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn describe(item: &ReviewItem) -> String {
    let next = item
        .next_review_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "now".to_string());
    format!(
        "{}\t{}\tinterval {}\tease {:.2}\tnext {}",
        item.item_key,
        item.title,
        format_interval(item.interval_days),
        item.ease,
        next
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.log_filter);

    let store = SqliteReviewStore::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))?;
    let service = ReviewService::new(store, SystemClock);

    match cli.cmd {
        Command::Add { owner, key, title } => {
            let item = service.upsert(&owner, &key, &title)?;
            println!("{}", describe(&item));
        }
        Command::Review {
            owner,
            key,
            outcome,
        } => {
            let item = service.review(&owner, &key, outcome)?;
            println!(
                "{}: {outcome}, next review in {}",
                item.item_key,
                format_interval(item.interval_days)
            );
        }
        Command::Due { owner, limit } => {
            for item in service.load_due(&owner, limit.unwrap_or(config.due_limit))? {
                println!("{}", describe(&item));
            }
        }
        Command::List { owner } => {
            for item in service.list(&owner)? {
                println!("{}", describe(&item));
            }
        }
        Command::Stats { owner } => {
            let stats = service.stats(&owner)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Study { owner, limit } => {
            let mut session = service.start_session(&owner, limit.unwrap_or(config.due_limit))?;
            run_study(&service, &mut session)?;
        }
        Command::Export { owner, output } => {
            let count = export_json_to_path(service.store(), &owner, &output, service.clock().now())?;
            println!("Exported {count} items to {}", output.display());
        }
        Command::Import { input } => {
            let export = import_json(service.store(), &input)?;
            println!("Imported {} items for {}", export.items.len(), export.owner);
        }
    }

    Ok(())
}

fn run_study<S: ReviewStore, C: Clock>(
    service: &ReviewService<S, C>,
    session: &mut ReviewSession,
) -> anyhow::Result<()> {
    if session.is_completed() {
        println!("Nothing due for {}", session.owner);
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();
    let mut round = 0;

    while let Some(item) = session.current_item() {
        if session.round_number != round {
            round = session.round_number;
            println!("{}", session.phase_message());
        }
        print!("{}? [y/n] ", item.title);
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            println!(
                "Session stopped with {} of {} items passed",
                session.passed_count(),
                session.total_count()
            );
            return Ok(());
        };
        let outcome = match line.parse::<ReviewOutcome>() {
            Ok(outcome) => outcome,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if let Some(saved) = service.answer(session, outcome)? {
            println!("  next review in {}", format_interval(saved.interval_days));
        }
    }

    println!(
        "Session complete: {} items, {} answers",
        session.total_count(),
        session.attempts()
    );
    Ok(())
}
