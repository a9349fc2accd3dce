//! Binary entrypoint for the Snoo-Clues CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `clues [--date <day>]` - show the day's clues
//! - `status --user <name>` - show a player's view of the day
//! - `guess --user <name> <answer>` - submit a guess
//! - `share --user <name>` - print the share line for a solved day
//! - `leaderboard [--top <n>]` - top players with ranks
//! - `audit [--catalog <file>]` - validate a puzzle catalog
//! - `purge` - drop expired daily records
//!
//! Pass `--json` to any command for machine-readable output.
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;

use snooclues::config::Config;
use snooclues::game::{GameService, RankedEntry};
use snooclues::puzzle::{audit, read_puzzles};
use snooclues::rank::Rank;
use snooclues::storage::{GameStore, SledStore};

#[derive(Parser)]
#[command(name = "snooclues")]
#[command(about = "Snoo-Clues: guess the subreddit from three clues")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Show the clues for a day
    Clues {
        /// Day to show (YYYY-MM-DD); defaults to today (UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show a player's game state for a day
    Status {
        #[arg(short, long)]
        user: String,
        /// Post id; defaults to game.default_post
        #[arg(short, long)]
        post: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Submit a guess
    Guess {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        post: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Subreddit name, `r/name`, or a reddit.com link
        guess: String,
    },
    /// Print the share message for a solved day
    Share {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        post: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Show the leaderboard
    Leaderboard {
        #[arg(short, long)]
        post: Option<String>,
        /// Number of rows; defaults to leaderboard.default_top
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Audit a puzzle catalog (defaults to the configured one)
    Audit {
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Remove expired daily records from the store
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init writes the config, so it never reads one. A missing config file means defaults;
    // an unreadable or invalid one is an error.
    let config = if matches!(cli.command, Commands::Init)
        || !std::path::Path::new(&cli.config).exists()
    {
        None
    } else {
        Some(Config::load(&cli.config).await?)
    };
    init_logging(&config, cli.verbose);
    if config.is_none() && !matches!(cli.command, Commands::Init) {
        warn!("No config file at {}; using defaults", cli.config);
    }
    run(cli, config.unwrap_or_default()).await
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let json = cli.json;
    let today = |date: Option<NaiveDate>| date.unwrap_or_else(|| Utc::now().date_naive());
    let post_or_default = |post: Option<String>| post.unwrap_or_else(|| config.game.default_post.clone());

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            if !json {
                println!("Wrote {}", cli.config);
            }
        }
        Commands::Audit { catalog } => {
            // Read without validation so a broken catalog still gets a full report.
            let puzzles = match catalog.as_ref().or(config.game.catalog_path.as_ref()) {
                Some(path) => read_puzzles(path)?,
                None => config.game.load_catalog()?.puzzles().to_vec(),
            };
            let report = audit(&puzzles);
            if json {
                emit_json(&report)?;
            } else {
                println!("Checked {} puzzles", report.checked);
                print_findings("Duplicates", &report.duplicates);
                print_findings("Clue count != 3", &report.invalid_clue_count);
                print_findings("Empty clues", &report.empty_clues);
                print_findings("Names over 16 chars (warning)", &report.too_long);
                println!("{}", if report.has_errors() { "AUDIT FAILED" } else { "AUDIT PASSED" });
            }
            if report.has_errors() {
                std::process::exit(1);
            }
        }
        Commands::Clues { date } => {
            let day = today(date);
            let catalog = config.game.load_catalog()?;
            let puzzle = catalog
                .select(&config.game.selection, day)
                .ok_or_else(|| anyhow::anyhow!("no puzzle for {}", day))?;
            if json {
                emit_json(&serde_json::json!({ "date": day, "clues": puzzle.clues }))?;
            } else {
                println!("{} for {}", config.game.name, day);
                for (i, clue) in puzzle.clues.iter().enumerate() {
                    println!("  {}. {}", i + 1, clue);
                }
            }
        }
        Commands::Status { user, post, date } => {
            let service = open_service(&config)?;
            let init = service.init(&post_or_default(post), &user, today(date))?;
            if json {
                emit_json(&init)?;
            } else {
                println!("{} for {} ({})", config.game.name, init.date, user);
                for (i, clue) in init.clues.iter().enumerate() {
                    println!("  {}. {}", i + 1, clue);
                }
                let names: Vec<&str> = init.choices.iter().map(|c| c.name.as_str()).collect();
                println!("Choices: {}", names.join(" | "));
                println!(
                    "Attempts: {}{}  Solved: {}",
                    init.attempts,
                    init.attempts_remaining
                        .map(|r| format!(" ({} left)", r))
                        .unwrap_or_default(),
                    if init.is_winner { "yes" } else { "no" }
                );
                if let Some(answer) = &init.answer {
                    println!("Answer: r/{}", answer);
                }
                print_standing(init.streak, init.total_wins, init.score);
            }
        }
        Commands::Guess {
            user,
            post,
            date,
            guess,
        } => {
            let service = open_service(&config)?;
            let outcome = service.guess(&post_or_default(post), &user, today(date), &guess)?;
            if json {
                emit_json(&outcome)?;
            } else if let Some(answer) = &outcome.answer {
                println!("Correct! It was r/{} (attempt {}).", answer, outcome.attempts);
                print_standing(outcome.streak, outcome.total_wins, outcome.score);
            } else {
                match outcome.attempts_remaining {
                    Some(left) => println!("Not quite. {} attempt(s) left.", left),
                    None => println!("Not quite. Attempts so far: {}.", outcome.attempts),
                }
            }
            service.store().flush()?;
        }
        Commands::Share { user, post, date } => {
            let service = open_service(&config)?;
            let text = service.share_text(&post_or_default(post), &user, today(date))?;
            if json {
                emit_json(&serde_json::json!({ "text": text }))?;
            } else {
                println!("{}", text);
            }
        }
        Commands::Leaderboard { post, top } => {
            let service = open_service(&config)?;
            let limit = top.unwrap_or(config.leaderboard.default_top);
            let rows = service.leaderboard(&post_or_default(post), limit)?;
            if json {
                emit_json(&rows)?;
            } else {
                print_leaderboard(&rows);
            }
        }
        Commands::Purge => {
            let store = SledStore::open(config.storage.db_path())?;
            let removed = store.purge_expired(Utc::now())?;
            info!("Purged {} expired daily record(s)", removed);
            if json {
                emit_json(&serde_json::json!({ "removed": removed }))?;
            } else {
                println!("Removed {} expired record(s).", removed);
            }
        }
    }
    Ok(())
}

fn open_service(config: &Config) -> Result<GameService<SledStore>> {
    let catalog = config.game.load_catalog()?;
    let store = SledStore::open(config.storage.db_path()).map_err(|e| {
        error!("Failed to open store at {}: {}", config.storage.db_path().display(), e);
        e
    })?;
    Ok(GameService::new(catalog, config.game.settings(), store))
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_findings(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("  ok   {}", label);
    } else {
        println!("  FAIL {}: {}", label, items.join(", "));
    }
}

fn print_standing(streak: u32, total_wins: u32, score: u64) {
    let rank = Rank::for_score(score);
    print!("Streak: {}  Wins: {}  Score: {}  Rank: {}", streak, total_wins, score, rank);
    match Rank::points_to_next(score) {
        Some(points) => println!(" ({} to next rank)", points),
        None => println!(),
    }
}

fn print_leaderboard(rows: &[RankedEntry]) {
    if rows.is_empty() {
        println!("No solves yet.");
        return;
    }
    for row in rows {
        println!("{:>3}. {:<20} {:>6}  {}", row.position, row.username, row.score, row.rank);
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity raises the configured level; it never lowers it.
    let configured = config
        .as_ref()
        .map(|c| c.logging.level_filter())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => configured.max(log::LevelFilter::Debug),
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // sled logs a lot at debug; keep it quiet unless explicitly tracing.
    if verbosity < 2 {
        builder.filter_module("sled", log::LevelFilter::Warn);
    }

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    let sink = log_file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match sink {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Foreground runs also echo to the console.
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
