//! Guess scoring and per-letter keyboard status.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::turkish;

/// Verdict for one letter of a guess.
///
/// Ordered `Absent < Present < Correct` so the best status of a letter is
/// simply the maximum seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Absent,
    Present,
    Correct,
}

impl Feedback {
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }

    #[must_use]
    pub fn emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬛',
        }
    }
}

/// Score `guess` against `target`.
///
/// Exact matches claim their letter counts first; the remaining counts are
/// then handed out left to right as `Present`. The result has one entry per
/// character of `guess`; positions past the end of `target` are always
/// `Absent`.
#[must_use]
pub fn evaluate(guess: &str, target: &str) -> Vec<Feedback> {
    let guess: Vec<char> = guess.chars().collect();
    let target: Vec<char> = target.chars().collect();
    let mut result = vec![Feedback::Absent; guess.len()];

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &c in &target {
        *remaining.entry(c).or_insert(0) += 1;
    }

    for (i, (g, t)) in guess.iter().zip(target.iter()).enumerate() {
        if g == t {
            result[i] = Feedback::Correct;
            if let Some(count) = remaining.get_mut(g) {
                *count = count.saturating_sub(1);
            }
        }
    }

    for (i, g) in guess.iter().enumerate().take(target.len()) {
        if result[i] == Feedback::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(g)
            && *count > 0
        {
            result[i] = Feedback::Present;
            *count -= 1;
        }
    }

    result
}

/// G/Y/X string for a feedback row, e.g. `"GYXXG"`.
#[must_use]
pub fn feedback_code(feedback: &[Feedback]) -> String {
    feedback.iter().map(|f| f.to_char()).collect()
}

/// Best status per letter over a whole session. Never downgrades.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardStatus {
    letters: BTreeMap<char, Feedback>,
}

impl KeyboardStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one scored guess into the map. Letters are stored lowercase.
    pub fn record(&mut self, guess: &str, feedback: &[Feedback]) {
        for (c, &status) in guess.chars().zip(feedback) {
            let key = turkish::lower_char(c);
            self.letters
                .entry(key)
                .and_modify(|best| *best = (*best).max(status))
                .or_insert(status);
        }
    }

    #[must_use]
    pub fn get(&self, letter: char) -> Option<Feedback> {
        self.letters.get(&turkish::lower_char(letter)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Feedback)> + '_ {
        self.letters.iter().map(|(&c, &f)| (c, f))
    }

    pub fn clear(&mut self) {
        self.letters.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}
