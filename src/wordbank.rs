//! Word list loading.
//!
//! A raw newline-delimited list is normalized with Turkish casing and grouped
//! into per-length partitions. Only entries of 4 to 9 Turkish letters survive.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::LexiconError;
use crate::turkish;
use crate::{debug_log, info_log};

pub const MIN_WORD_LENGTH: usize = 4;
pub const MAX_WORD_LENGTH: usize = 9;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/sozluk.txt");

/// Normalized word list, partitioned by length.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: Vec<String>,
    by_length: BTreeMap<usize, Vec<String>>,
    lookup: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from raw entries, normalizing and filtering each one.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        for entry in entries {
            if let Some(word) = normalize_entry(entry.as_ref()) {
                lexicon.push(word);
            }
        }
        lexicon
    }

    fn push(&mut self, word: String) {
        let length = word.chars().count();
        self.by_length
            .entry(length)
            .or_default()
            .push(word.clone());
        self.lookup.insert(word.clone());
        self.words.push(word);
    }

    /// Every word in source order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words of exactly `length` letters in source order; empty if none.
    #[must_use]
    pub fn partition(&self, length: usize) -> &[String] {
        self.by_length.get(&length).map_or(&[], Vec::as_slice)
    }

    /// Membership test against the partition matching the word's own length.
    ///
    /// Partitions are disjoint by length, so a lookup in the flat set is the
    /// same as a lookup in the word's partition.
    #[must_use]
    pub fn contains_word(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    /// Lengths that have at least one word, ascending.
    #[must_use]
    pub fn available_lengths(&self) -> Vec<usize> {
        self.by_length
            .iter()
            .filter(|(_, words)| !words.is_empty())
            .map(|(&length, _)| length)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Trim, lowercase with Turkish rules and validate a single line.
#[must_use]
pub fn normalize_entry(line: &str) -> Option<String> {
    let word = turkish::lower(line.trim());
    let length = word.chars().count();
    if (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length) && turkish::is_lowercase_word(&word) {
        Some(word)
    } else {
        None
    }
}

/// Parse newline-delimited text (`\n` or `\r\n`).
///
/// # Errors
///
/// Returns [`LexiconError::Empty`] if no line survives filtering.
pub fn load_wordbank_from_str(data: &str) -> Result<Lexicon, LexiconError> {
    let lexicon = Lexicon::from_entries(data.lines());
    if lexicon.is_empty() {
        return Err(LexiconError::Empty);
    }
    info_log!(
        "Word list loaded: {} words, lengths {:?}",
        lexicon.len(),
        lexicon.available_lengths()
    );
    Ok(lexicon)
}

/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// [`LexiconError::Empty`] if it contains no usable words.
pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Lexicon, LexiconError> {
    let path = path.as_ref();
    debug_log!("Reading word list from {}", path.display());
    let data = fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_wordbank_from_str(&data)
}

/// The word list compiled into the binary.
///
/// # Errors
///
/// Only fails if the embedded list were emptied at build time.
pub fn load_embedded_wordbank() -> Result<Lexicon, LexiconError> {
    load_wordbank_from_str(EMBEDDED_WORDBANK)
}

/// Download a word list over HTTP(S).
///
/// # Errors
///
/// Returns [`LexiconError::Http`] on transport or status errors.
#[cfg(feature = "network")]
pub fn fetch_wordbank(url: &str) -> Result<Lexicon, LexiconError> {
    info_log!("Downloading word list from {}", url);
    let to_err = |source| LexiconError::Http {
        url: url.to_string(),
        source,
    };
    let text = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(to_err)?;
    load_wordbank_from_str(&text)
}

#[cfg(not(feature = "network"))]
fn fetch_wordbank(url: &str) -> Result<Lexicon, LexiconError> {
    Err(LexiconError::NetworkDisabled {
        url: url.to_string(),
    })
}

/// Load from a URL, a file path, or the embedded list when `source` is `None`.
///
/// # Errors
///
/// Propagates the error of whichever loader was used.
pub fn load_wordbank(source: Option<&str>) -> Result<Lexicon, LexiconError> {
    match source {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            fetch_wordbank(url)
        }
        Some(path) => load_wordbank_from_file(path),
        None => load_embedded_wordbank(),
    }
}
