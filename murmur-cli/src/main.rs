use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use murmur_core::time::{now_in_tz, parse_local_clock};
use murmur_core::{CategoryOption, Field, ParsedTransaction};
use murmur_extract::ExpenseParser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "murmur",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MURMUR_BUILD_SHA"), ")"),
    about = "Turn a spoken expense sentence into a structured transaction"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where "now" comes from for relative phrases like "yesterday".
#[derive(clap::Args, Debug)]
struct ClockArgs {
    /// Reference clock, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (noon)
    #[arg(long)]
    now: Option<String>,

    /// IANA time zone for the current clock (default: [profile].timezone)
    #[arg(long)]
    tz: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one transcript
    Parse {
        /// The sentence; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,

        /// JSON array of {"id", "name"} categories
        #[arg(long)]
        categories: Option<PathBuf>,

        #[command(flatten)]
        clock: ClockArgs,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a file with one transcript per line, emitting JSON lines
    Batch {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        categories: Option<PathBuf>,

        #[command(flatten)]
        clock: ClockArgs,
    },

    /// List the categories transcripts are matched against
    Categories {
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// Manage ~/.murmur/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Command::Parse {
            text,
            categories,
            clock,
            json,
        } => {
            let cfg = config::load_config()?;
            let cats = load_categories(categories, &cfg)?;
            let now = reference_clock(&clock, &cfg)?;
            let parser = build_parser(&cfg)?;

            let text = text.join(" ");
            let tx = parser
                .parse(&text, &cats, now)
                .with_context(|| format!("parsing {text:?}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tx)?);
            } else {
                print_transaction(&tx, now);
            }
        }

        Command::Batch {
            input,
            categories,
            clock,
        } => {
            let cfg = config::load_config()?;
            let cats = load_categories(categories, &cfg)?;
            let now = reference_clock(&clock, &cfg)?;
            let parser = build_parser(&cfg)?;
            run_batch(&parser, &input, &cats, now)?;
        }

        Command::Categories { categories } => {
            let cfg = config::load_config()?;
            let cats = load_categories(categories, &cfg)?;
            for c in &cats {
                println!("{:<16} {}", c.id, c.name);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn build_parser(cfg: &Config) -> Result<ExpenseParser> {
    ExpenseParser::new(cfg.parser.clone()).context("invalid [parser] config")
}

fn load_categories(explicit: Option<PathBuf>, cfg: &Config) -> Result<Vec<CategoryOption>> {
    let cats = state::resolve_categories(
        explicit.as_deref(),
        cfg.profile.categories_file.as_deref(),
    )?;
    debug!(count = cats.len(), "categories loaded");
    Ok(cats)
}

fn reference_clock(clock: &ClockArgs, cfg: &Config) -> Result<NaiveDateTime> {
    if let Some(local) = &clock.now {
        return parse_local_clock(local);
    }
    let tz = clock.tz.as_deref().unwrap_or(&cfg.profile.timezone);
    now_in_tz(tz)
}

fn run_batch(
    parser: &ExpenseParser,
    input: &Path,
    cats: &[CategoryOption],
    now: NaiveDateTime,
) -> Result<()> {
    let content =
        fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;

    let mut parsed = 0usize;
    let mut flagged = 0usize;
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let tx = parser
            .parse(line, cats, now)
            .with_context(|| format!("line {}", i + 1))?;
        parsed += 1;
        if tx.needs_review() {
            flagged += 1;
            warn!(line = i + 1, fields = %format_fields(&tx.confidence.flagged()), "needs review");
        }
        println!("{}", serde_json::to_string(&tx)?);
    }

    info!(parsed, flagged, input = %input.display(), "batch done");
    Ok(())
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_transaction(tx: &ParsedTransaction, now: NaiveDateTime) {
    let c = &tx.confidence;
    println!("type:        {} ({})", tx.kind, c.kind);
    match tx.amount {
        Some(amount) => println!(
            "amount:      {}{} {} ({}, currency {})",
            tx.currency.symbol(),
            amount,
            tx.currency,
            c.amount,
            c.currency
        ),
        None => println!("amount:      -"),
    }
    match tx.date {
        Some(d) => println!("date:        {} ({})", d.format("%Y-%m-%d %H:%M"), c.date),
        None => println!(
            "date:        - (defaults to {})",
            tx.date_or(now).format("%Y-%m-%d %H:%M")
        ),
    }
    match &tx.merchant {
        Some(m) => println!("merchant:    {m} ({})", c.merchant),
        None => println!("merchant:    -"),
    }
    match (&tx.category_name, &tx.category_id) {
        (Some(name), Some(id)) => println!("category:    {name} [{id}] ({})", c.category),
        _ => println!("category:    -"),
    }
    println!("description: {} ({})", tx.description, c.description);

    let flagged = c.flagged();
    if !flagged.is_empty() {
        println!("\nreview: {}", format_fields(&flagged));
    }
}
