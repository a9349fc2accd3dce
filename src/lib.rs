//! # Snoo-Clues - Daily Subreddit Guessing Game
//!
//! Players read three progressively revealed clues and guess which subreddit they
//! describe. One puzzle per day, with win streaks, detective ranks and a per-post
//! leaderboard.
//!
//! ## Features
//!
//! - **Daily Puzzles**: calendar-dated or rotating selection from a JSON catalog.
//! - **Streaks**: consecutive-day wins counted on calendar dates, never timestamps.
//! - **Ranks**: five detective tiers from cumulative leaderboard points.
//! - **Multiple Choice**: four options with category-diverse distractors.
//! - **Persistence**: sled-backed store with atomic counters and expiring daily records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use snooclues::config::Config;
//! use snooclues::game::GameService;
//! use snooclues::storage::SledStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = SledStore::open(config.storage.db_path())?;
//!     let service = GameService::new(config.game.load_catalog()?, config.game.settings(), store);
//!     let today = Utc::now().date_naive();
//!     let outcome = service.guess(&config.game.default_post, "alice", today, "r/aww")?;
//!     println!("correct: {}", outcome.correct);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`puzzle`] - puzzle type, catalog loading, selection policies, catalog audit
//! - [`streak`] - streak arithmetic on calendar days
//! - [`rank`] - score to rank mapping
//! - [`choices`] - multiple-choice option generation
//! - [`normalize`] - answer normalization
//! - [`storage`] - the `GameStore` trait and its sled/in-memory implementations
//! - [`game`] - the game service used by request handlers and the CLI
//! - [`config`] - configuration management and validation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   CLI / Host    │ ← Request handling
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  GameService    │ ← Game flow, scoring
//! └─────────────────┘
//!     │          │
//! ┌────────┐ ┌──────────┐
//! │ Logic  │ │ Storage  │ ← Pure functions / injected store
//! └────────┘ └──────────┘
//! ```

pub mod choices;
pub mod config;
pub mod game;
pub mod logutil;
pub mod normalize;
pub mod puzzle;
pub mod rank;
pub mod storage;
pub mod streak;
