//! Target word selection.
//!
//! The index into a length partition is derived from the calendar so that
//! every player sees the same word for a given day and length.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::debug_log;
use crate::wordbank::Lexicon;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Year, day of year and length only: one word per length per day.
    #[default]
    Daily,
    /// Also mixes in hour and minute, so the word changes during the day.
    Intraday,
}

/// Seed sum before the modulo. `ordinal` is 1 on January 1st.
fn seed(length: usize, at: NaiveDateTime, policy: SelectionPolicy) -> usize {
    let date = at.date();
    let mut sum = date.ordinal() as usize + date.year().unsigned_abs() as usize + length;
    if policy == SelectionPolicy::Intraday {
        sum += at.hour() as usize + at.minute() as usize;
    }
    sum
}

/// Pick the target for `length`, or `None` if the partition is empty.
///
/// With `avoid`, walks forward from the calendar index (at most twice the
/// partition size) until a different word is found; a single-word partition
/// returns its only word.
#[must_use]
pub fn select_target<'a>(
    length: usize,
    lexicon: &'a Lexicon,
    avoid: Option<&str>,
    at: NaiveDateTime,
    policy: SelectionPolicy,
) -> Option<&'a str> {
    let candidates = lexicon.partition(length);
    if candidates.is_empty() {
        return None;
    }

    let base = seed(length, at, policy);
    let chosen = candidates[base % candidates.len()].as_str();

    let Some(avoid) = avoid else {
        return Some(chosen);
    };
    if chosen != avoid || candidates.len() == 1 {
        return Some(chosen);
    }

    for offset in 1..=2 * candidates.len() {
        let candidate = candidates[(base + offset) % candidates.len()].as_str();
        if candidate != avoid {
            debug_log!("Avoided repeat target, moved {} slots", offset);
            return Some(candidate);
        }
    }
    Some(chosen)
}

/// Pick a random playable length for dynamic mode.
pub fn random_length<R: Rng + ?Sized>(lexicon: &Lexicon, rng: &mut R) -> Option<usize> {
    let lengths = lexicon.available_lengths();
    if lengths.is_empty() {
        return None;
    }
    Some(lengths[rng.random_range(0..lengths.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordbank::load_wordbank_from_str;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn lexicon() -> Lexicon {
        load_wordbank_from_str("kalem\nkitap\nçiçek\nşeker\ndeniz\nmasa\n").unwrap()
    }

    #[test]
    fn test_daily_index_formula() {
        let lexicon = lexicon();
        // Jan 1 2024: ordinal 1 + 2024 + length 5 = 2030; 2030 % 5 = 0
        let word = select_target(5, &lexicon, None, at(2024, 1, 1, 9, 0), SelectionPolicy::Daily);
        assert_eq!(word, Some("kalem"));
        // Jan 2 moves one slot
        let word = select_target(5, &lexicon, None, at(2024, 1, 2, 9, 0), SelectionPolicy::Daily);
        assert_eq!(word, Some("kitap"));
    }

    #[test]
    fn test_daily_is_stable_across_the_day() {
        let lexicon = lexicon();
        let morning = select_target(5, &lexicon, None, at(2024, 6, 3, 0, 1), SelectionPolicy::Daily);
        let night = select_target(5, &lexicon, None, at(2024, 6, 3, 23, 59), SelectionPolicy::Daily);
        assert_eq!(morning, night);
    }

    #[test]
    fn test_intraday_includes_hour_and_minute() {
        let lexicon = lexicon();
        // 2030 + 1 + 2 = 2033; 2033 % 5 = 3
        let word = select_target(5, &lexicon, None, at(2024, 1, 1, 1, 2), SelectionPolicy::Intraday);
        assert_eq!(word, Some("şeker"));
    }

    #[test]
    fn test_deterministic_with_frozen_clock() {
        let lexicon = lexicon();
        let now = at(2025, 10, 16, 14, 45);
        for policy in [SelectionPolicy::Daily, SelectionPolicy::Intraday] {
            let first = select_target(5, &lexicon, None, now, policy);
            for _ in 0..10 {
                assert_eq!(select_target(5, &lexicon, None, now, policy), first);
            }
        }
    }

    #[test]
    fn test_empty_partition_returns_none() {
        let lexicon = lexicon();
        assert_eq!(select_target(7, &lexicon, None, at(2024, 1, 1, 0, 0), SelectionPolicy::Daily), None);
    }

    #[test]
    fn test_avoid_picks_a_different_word() {
        let lexicon = lexicon();
        let now = at(2024, 1, 1, 9, 0);
        let word = select_target(5, &lexicon, Some("kalem"), now, SelectionPolicy::Daily);
        assert_eq!(word, Some("kitap"));

        // Avoiding something that would not be chosen anyway changes nothing
        let word = select_target(5, &lexicon, Some("deniz"), now, SelectionPolicy::Daily);
        assert_eq!(word, Some("kalem"));
    }

    #[test]
    fn test_avoid_with_single_candidate_falls_back() {
        let lexicon = lexicon();
        let word = select_target(4, &lexicon, Some("masa"), at(2024, 1, 1, 0, 0), SelectionPolicy::Daily);
        assert_eq!(word, Some("masa"));
    }

    #[test]
    fn test_avoid_with_duplicate_entries_falls_back() {
        let lexicon = load_wordbank_from_str("masa\nmasa\nmasa").unwrap();
        let word = select_target(4, &lexicon, Some("masa"), at(2024, 1, 1, 0, 0), SelectionPolicy::Daily);
        assert_eq!(word, Some("masa"));
    }

    #[test]
    fn test_random_length_is_available_and_seeded() {
        let lexicon = lexicon();
        let mut rng = StdRng::seed_from_u64(7);
        let mut again = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let length = random_length(&lexicon, &mut rng).unwrap();
            assert!(length == 4 || length == 5);
            assert_eq!(Some(length), random_length(&lexicon, &mut again));
        }
    }

    #[test]
    fn test_random_length_on_empty_lexicon() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_length(&Lexicon::default(), &mut rng), None);
    }
}
