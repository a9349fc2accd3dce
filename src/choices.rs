//! Multiple-choice options for the guided variant of the daily game.
//!
//! Distractors are picked greedily from a shuffled catalog, preferring categories not yet
//! represented; when the catalog runs out of fresh categories the remaining slots are
//! backfilled from any unused entry. The result is shuffled so the answer is not always
//! first. Small catalogs produce fewer than [`CHOICE_COUNT`] options rather than repeats.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;

/// Options offered per game, the answer included.
pub const CHOICE_COUNT: usize = 4;

/// Button color for every option (Reddit orange).
pub const CHOICE_COLOR: &str = "#FF4500";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub color: String,
}

impl Choice {
    fn new(name: &str) -> Self {
        Choice {
            name: name.to_string(),
            color: CHOICE_COLOR.to_string(),
        }
    }
}

/// Build up to [`CHOICE_COUNT`] options for `correct` using `rng` for both shuffles.
///
/// Returns an empty list when `correct` is not an answer in `catalog`.
pub fn multiple_choices_with<R: Rng + ?Sized>(
    correct: &str,
    catalog: &[Puzzle],
    rng: &mut R,
) -> Vec<Choice> {
    let Some(answer) = catalog.iter().find(|p| p.subreddit == correct) else {
        return Vec::new();
    };

    let mut choices = vec![Choice::new(correct)];
    let mut used_categories: HashSet<&str> = HashSet::new();
    used_categories.insert(answer.category.as_str());

    let mut shuffled: Vec<&Puzzle> = catalog.iter().collect();
    shuffled.shuffle(rng);

    for p in &shuffled {
        if choices.len() >= CHOICE_COUNT {
            break;
        }
        if p.subreddit != correct
            && !used_categories.contains(p.category.as_str())
            && !choices.iter().any(|c| c.name == p.subreddit)
        {
            choices.push(Choice::new(&p.subreddit));
            used_categories.insert(p.category.as_str());
        }
    }

    if choices.len() < CHOICE_COUNT {
        for p in &shuffled {
            if choices.len() >= CHOICE_COUNT {
                break;
            }
            if p.subreddit != correct && !choices.iter().any(|c| c.name == p.subreddit) {
                choices.push(Choice::new(&p.subreddit));
            }
        }
    }

    choices.shuffle(rng);
    choices
}

/// [`multiple_choices_with`] using the thread-local RNG.
pub fn multiple_choices(correct: &str, catalog: &[Puzzle]) -> Vec<Choice> {
    multiple_choices_with(correct, catalog, &mut rand::thread_rng())
}
