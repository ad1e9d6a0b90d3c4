use serde::{Deserialize, Serialize};

use crate::feedback::Feedback;
use crate::session::Mode;

/// Bumped whenever the persisted layout changes; older saves are ignored.
pub const SCHEMA_VERSION: u32 = 2;

/// One submitted guess with its verdicts, in the order it was played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub word: String,
    pub feedback: Vec<Feedback>,
    pub length: usize,
}

impl GuessRecord {
    #[must_use]
    pub fn new(word: &str, feedback: Vec<Feedback>) -> Self {
        Self {
            word: word.to_string(),
            length: word.chars().count(),
            feedback,
        }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.feedback.iter().all(|&f| f == Feedback::Correct)
    }

    fn is_consistent(&self) -> bool {
        self.length == self.word.chars().count() && self.length == self.feedback.len()
    }
}

/// Snapshot of an in-progress or finished game, stored once per guess.
///
/// On disk the guess list is `guesses` for classic games and `history` for
/// dynamic ones; either name is read back for any mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoredGame", from = "StoredGame")]
pub struct GameState {
    pub schema_version: u32,
    pub mode: Mode,
    pub target_word: String,
    pub guesses: Vec<GuessRecord>,
    pub cursor_row: usize,
    pub won: bool,
    pub lost: bool,
    pub date: String,
    pub length: usize,
}

/// JSON layout of [`GameState`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGame {
    #[serde(default)]
    schema_version: u32,
    mode: Mode,
    target_word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guesses: Option<Vec<GuessRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history: Option<Vec<GuessRecord>>,
    cursor_row: usize,
    won: bool,
    lost: bool,
    date: String,
    length: usize,
}

impl From<GameState> for StoredGame {
    fn from(state: GameState) -> Self {
        let (guesses, history) = match state.mode {
            Mode::Classic => (Some(state.guesses), None),
            Mode::Dynamic => (None, Some(state.guesses)),
        };
        Self {
            schema_version: state.schema_version,
            mode: state.mode,
            target_word: state.target_word,
            guesses,
            history,
            cursor_row: state.cursor_row,
            won: state.won,
            lost: state.lost,
            date: state.date,
            length: state.length,
        }
    }
}

impl From<StoredGame> for GameState {
    fn from(stored: StoredGame) -> Self {
        Self {
            schema_version: stored.schema_version,
            mode: stored.mode,
            target_word: stored.target_word,
            guesses: stored.guesses.or(stored.history).unwrap_or_default(),
            cursor_row: stored.cursor_row,
            won: stored.won,
            lost: stored.lost,
            date: stored.date,
            length: stored.length,
        }
    }
}

impl GameState {
    /// Check if loaded data has a stale schema version and must be discarded.
    #[must_use]
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.won || self.lost
    }

    /// Structural sanity of a snapshot read back from storage.
    ///
    /// The cursor sits on the next free row while playing and on the last
    /// played row once the game is over.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.won && self.lost {
            return false;
        }
        if self.target_word.chars().count() != self.length {
            return false;
        }
        if !self.guesses.iter().all(GuessRecord::is_consistent) {
            return false;
        }
        if self.won
            && self
                .guesses
                .last()
                .is_none_or(|last| last.word != self.target_word)
        {
            return false;
        }
        if self.is_over() {
            self.cursor_row + 1 == self.guesses.len()
        } else {
            self.cursor_row == self.guesses.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::evaluate;

    fn classic_state() -> GameState {
        let guesses = vec![GuessRecord::new("kitap", evaluate("kitap", "kalem"))];
        GameState {
            schema_version: SCHEMA_VERSION,
            mode: Mode::Classic,
            target_word: "kalem".to_string(),
            cursor_row: guesses.len(),
            guesses,
            won: false,
            lost: false,
            date: "2024-3-7".to_string(),
            length: 5,
        }
    }

    #[test]
    fn test_guess_record_length_counts_chars() {
        let record = GuessRecord::new("ığdır", vec![Feedback::Absent; 5]);
        assert_eq!(record.length, 5);
        assert!(!record.is_solved());
        assert!(GuessRecord::new("masa", vec![Feedback::Correct; 4]).is_solved());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(classic_state()).unwrap();
        assert_eq!(json["targetWord"], "kalem");
        assert_eq!(json["cursorRow"], 1);
        assert_eq!(json["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(json["mode"], "classic");
        assert_eq!(json["guesses"][0]["feedback"][0], "correct");
        assert_eq!(json["guesses"][0]["length"], 5);
    }

    #[test]
    fn test_dynamic_saves_write_history() {
        let mut state = classic_state();
        state.mode = Mode::Dynamic;
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["history"][0]["word"], "kitap");
        assert!(json.get("guesses").is_none());

        let classic = serde_json::to_value(classic_state()).unwrap();
        assert!(classic.get("history").is_none());

        let back: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_history_field_is_read() {
        let json = r#"{
            "schemaVersion": 2,
            "mode": "dynamic",
            "targetWord": "masa",
            "history": [{"word": "elma", "feedback": ["absent","absent","present","correct"], "length": 4}],
            "cursorRow": 1,
            "won": false,
            "lost": false,
            "date": "2024-3-7",
            "length": 4
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.mode, Mode::Dynamic);
        assert_eq!(state.guesses.len(), 1);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_missing_version_needs_reset() {
        let mut json = serde_json::to_value(classic_state()).unwrap();
        json.as_object_mut().unwrap().remove("schemaVersion");
        let state: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(state.schema_version, 0);
        assert!(state.needs_reset());
        assert!(!classic_state().needs_reset());
    }

    #[test]
    fn test_consistency_checks() {
        assert!(classic_state().is_consistent());

        let mut state = classic_state();
        state.cursor_row = 3;
        assert!(!state.is_consistent());

        let mut state = classic_state();
        state.won = true;
        assert!(!state.is_consistent(), "won without the target as last guess");

        let mut state = classic_state();
        state.lost = true;
        state.cursor_row = 0;
        assert!(state.is_consistent());

        let mut state = classic_state();
        state.length = 6;
        assert!(!state.is_consistent());

        let mut state = classic_state();
        state.guesses[0].feedback.pop();
        assert!(!state.is_consistent());
    }
}
