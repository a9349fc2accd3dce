use chrono::NaiveDate;
use thiserror::Error;

use crate::storage::StoreError;

/// Reasons a game request is refused.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("login required")]
    LoginRequired,

    #[error("invalid guess")]
    InvalidGuess,

    #[error("you've already solved today's puzzle!")]
    AlreadySolved,

    #[error("you must solve the puzzle before sharing")]
    NotSolved,

    #[error("no attempts left today (limit {max})")]
    OutOfAttempts { max: u32 },

    /// Only reachable with an empty catalog.
    #[error("no puzzle available for {0}")]
    NoPuzzle(NaiveDate),

    #[error(transparent)]
    Store(#[from] StoreError),
}
