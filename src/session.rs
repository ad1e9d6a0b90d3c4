//! Session controller: mode/length selection, turn sequencing, win/loss and
//! persistence.
//!
//! # State Machine
//! - `ModeSelect` → `LengthSelect` (classic only) → `Playing` → `Won` | `Lost`
//! - [`SessionController::reset`] returns to `ModeSelect` from anywhere.
//!
//! Classic and dynamic play run through the same code; they differ only in
//! their [`SessionConfig`].

use log::{error, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, date_key};
use crate::error::{LexiconError, Rejection, SessionError, SetupError, SubmitError};
use crate::feedback::{Feedback, KeyboardStatus, evaluate};
use crate::game_state::{GameState, GuessRecord, SCHEMA_VERSION};
use crate::selector::{SelectionPolicy, random_length, select_target};
use crate::store::{GameStore, KeyValueStorage, SaveSlot};
use crate::turkish;
use crate::wordbank::{Lexicon, MAX_WORD_LENGTH, MIN_WORD_LENGTH, load_wordbank};
use crate::{debug_log, info_log};

pub const CLASSIC_MAX_TRIES: usize = 6;
pub const DYNAMIC_MAX_TRIES: usize = 10;

const SAVE_FAILED_MESSAGE: &str = "Oyun durumu kaydedilemedi.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Player picks the word length, 6 tries.
    Classic,
    /// Hidden random length between 4 and 9, 10 tries.
    Dynamic,
}

impl Mode {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Classic => "Klasik Wordle",
            Self::Dynamic => "4-9 Oyunu",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthPolicy {
    Fixed(usize),
    RandomPerSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub min_length: usize,
    pub max_length: usize,
    pub max_tries: usize,
    pub length_policy: LengthPolicy,
}

impl SessionConfig {
    #[must_use]
    pub fn classic(length: usize) -> Self {
        Self {
            mode: Mode::Classic,
            min_length: length,
            max_length: length,
            max_tries: CLASSIC_MAX_TRIES,
            length_policy: LengthPolicy::Fixed(length),
        }
    }

    #[must_use]
    pub fn dynamic() -> Self {
        Self {
            mode: Mode::Dynamic,
            min_length: MIN_WORD_LENGTH,
            max_length: MAX_WORD_LENGTH,
            max_tries: DYNAMIC_MAX_TRIES,
            length_policy: LengthPolicy::RandomPerSession,
        }
    }

    #[must_use]
    pub fn save_slot(&self) -> SaveSlot {
        match self.length_policy {
            LengthPolicy::Fixed(length) => SaveSlot::Classic { length },
            LengthPolicy::RandomPerSession => SaveSlot::Dynamic,
        }
    }

    /// How many letters fit in one row.
    #[must_use]
    pub fn row_capacity(&self) -> usize {
        self.max_length
    }

    fn check_complete(&self, typed: usize) -> Result<(), Rejection> {
        match self.length_policy {
            LengthPolicy::Fixed(expected) if typed != expected => {
                Err(Rejection::Incomplete { expected, got: typed })
            }
            LengthPolicy::RandomPerSession if typed < self.min_length => Err(Rejection::TooShort {
                min: self.min_length,
                got: typed,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    ModeSelect,
    LengthSelect,
    Playing,
    Won,
    Lost,
}

impl Phase {
    #[must_use]
    pub fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A key from the on-screen or physical keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Always stored lowercase.
    Letter(char),
    Enter,
    Backspace,
}

impl Key {
    /// Accepts `ENTER`, `BACKSPACE`/`⌫` (any case) or a single Turkish letter.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match turkish::upper(input).as_str() {
            "ENTER" => Some(Self::Enter),
            "BACKSPACE" | "⌫" => Some(Self::Backspace),
            _ => {
                let mut chars = input.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Self::from_char(c)
            }
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let lower = turkish::lower_char(c);
        turkish::is_lowercase_letter(lower).then_some(Self::Letter(lower))
    }
}

/// Everything the controller knows about the current session.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    phase: Phase,
    config: Option<SessionConfig>,
    target: String,
    word_length: usize,
    date: String,
    guesses: Vec<GuessRecord>,
    cursor_row: usize,
    row: Vec<char>,
    keyboard: KeyboardStatus,
    processing: bool,
    restored: bool,
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.config.map(|c| c.mode)
    }

    #[must_use]
    pub fn max_tries(&self) -> usize {
        self.config.map_or(0, |c| c.max_tries)
    }

    /// The target word. Frontends should only show it once the game is over.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    #[must_use]
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    #[must_use]
    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    /// Letters typed into the active row so far.
    #[must_use]
    pub fn current_row(&self) -> &[char] {
        &self.row
    }

    #[must_use]
    pub fn current_input(&self) -> String {
        self.row.iter().collect()
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardStatus {
        &self.keyboard
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// True if the session resumed a saved game.
    #[must_use]
    pub fn restored(&self) -> bool {
        self.restored
    }
}

/// Result of one accepted guess, handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub record: GuessRecord,
    pub row: usize,
    pub keyboard: KeyboardStatus,
    pub phase: Phase,
    /// Set when the turn could not be persisted.
    pub warning: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Typed(char),
    Erased,
    Ignored,
    Submitted(TurnReport),
    Rejected(Rejection),
    Aborted(SessionError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartReport {
    pub mode: Mode,
    pub word_length: usize,
    pub max_tries: usize,
    pub restored: bool,
    /// Size of the whole word list.
    pub word_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub mode: Mode,
    pub won: bool,
    pub attempts: usize,
    pub max_tries: usize,
    pub target: String,
    pub share: String,
}

pub struct SessionController<S: KeyValueStorage, C: Clock> {
    lexicon: Lexicon,
    store: GameStore<S>,
    clock: C,
    policy: SelectionPolicy,
    rng: StdRng,
    last_target: Option<String>,
    state: SessionState,
    word_source: Option<String>,
    setup_error: Option<String>,
}

impl<S: KeyValueStorage, C: Clock> SessionController<S, C> {
    pub fn new(lexicon: Lexicon, storage: S, clock: C, policy: SelectionPolicy) -> Self {
        Self {
            lexicon,
            store: GameStore::new(storage),
            clock,
            policy,
            rng: StdRng::from_os_rng(),
            last_target: None,
            state: SessionState::default(),
            word_source: None,
            setup_error: None,
        }
    }

    /// Where [`Self::retry_setup`] reloads the word list from; `None` is the
    /// embedded list.
    #[must_use]
    pub fn with_word_source(mut self, source: Option<String>) -> Self {
        self.word_source = source;
        self
    }

    /// Record a failed word list load. Games cannot start until
    /// [`Self::retry_setup`] succeeds.
    #[must_use]
    pub fn with_setup_error(mut self, error: &LexiconError) -> Self {
        self.setup_error = Some(error.to_string());
        self
    }

    pub fn setup_error(&self) -> Option<&str> {
        self.setup_error.as_deref()
    }

    /// Reload the word list and go back to mode selection.
    ///
    /// # Errors
    /// The load failure, which is also kept as the current setup error.
    pub fn retry_setup(&mut self) -> Result<usize, LexiconError> {
        match load_wordbank(self.word_source.as_deref()) {
            Ok(lexicon) => {
                info_log!("Word list reloaded with {} words", lexicon.len());
                self.lexicon = lexicon;
                self.setup_error = None;
                self.last_target = None;
                self.reset();
                Ok(self.lexicon.len())
            }
            Err(e) => {
                warn!("Word list reload failed: {e}");
                self.setup_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Make dynamic-mode length choice reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    pub fn available_lengths(&self) -> Vec<usize> {
        self.lexicon.available_lengths()
    }

    /// Discard the in-memory session and go back to mode selection.
    /// Persisted saves are left alone.
    pub fn reset(&mut self) {
        debug_log!("Session reset to mode selection");
        self.state = SessionState::default();
    }

    /// Choose a mode. Classic waits for a length; dynamic starts right away.
    ///
    /// # Errors
    /// Setup errors leave the controller in `ModeSelect`.
    pub fn select_mode(&mut self, mode: Mode) -> Result<Phase, SetupError> {
        self.reset();
        if self.setup_error.is_some() {
            return Err(SetupError::WordListUnavailable);
        }
        match mode {
            Mode::Classic => {
                self.state.phase = Phase::LengthSelect;
                Ok(Phase::LengthSelect)
            }
            Mode::Dynamic => {
                let length = random_length(&self.lexicon, &mut self.rng)
                    .ok_or(SetupError::NoPlayableLengths)?;
                info_log!("Dynamic mode target length: {}", length);
                self.start(SessionConfig::dynamic(), length)?;
                Ok(self.state.phase)
            }
        }
    }

    /// Pick the classic word length and start playing.
    ///
    /// # Errors
    /// `WrongPhase` outside length selection, `UnavailableLength` if the
    /// word list has no words of that length.
    pub fn select_length(&mut self, length: usize) -> Result<StartReport, SetupError> {
        if self.state.phase != Phase::LengthSelect {
            return Err(SetupError::WrongPhase);
        }
        if self.lexicon.partition(length).is_empty() {
            return Err(SetupError::UnavailableLength(length));
        }
        self.start(SessionConfig::classic(length), length)
    }

    fn start(&mut self, config: SessionConfig, length: usize) -> Result<StartReport, SetupError> {
        let today = date_key(self.clock.today());
        self.store.purge_stale(&today);

        let avoid = match config.mode {
            Mode::Dynamic => self.last_target.as_deref(),
            Mode::Classic => None,
        };
        let Some(target) =
            select_target(length, &self.lexicon, avoid, self.clock.now(), self.policy)
        else {
            error!("No target word of length {length}");
            self.reset();
            return Err(SetupError::EmptyPartition(length));
        };

        self.state = SessionState {
            phase: Phase::Playing,
            config: Some(config),
            target: target.to_string(),
            word_length: length,
            date: today,
            ..SessionState::default()
        };

        if let Some(saved) = self.store.load(&self.state.date, config.save_slot()) {
            self.try_restore(saved);
        }
        self.last_target = Some(self.state.target.clone());

        info_log!(
            "Session started: mode={:?} length={} restored={}",
            config.mode,
            length,
            self.state.restored
        );
        Ok(StartReport {
            mode: config.mode,
            word_length: length,
            max_tries: config.max_tries,
            restored: self.state.restored,
            word_count: self.lexicon.len(),
        })
    }

    /// Resume `saved` if it belongs to this session; otherwise keep the
    /// fresh start.
    fn try_restore(&mut self, saved: GameState) {
        let Some(config) = self.state.config else {
            return;
        };
        let matches_session = saved.mode == config.mode
            && match config.length_policy {
                LengthPolicy::Fixed(_) => saved.target_word == self.state.target,
                LengthPolicy::RandomPerSession => saved.length == self.state.word_length,
            };
        if !matches_session {
            debug_log!("Saved game does not match this session, starting fresh");
            return;
        }
        let within_tries = if saved.is_over() {
            saved.guesses.len() <= config.max_tries
        } else {
            saved.cursor_row < config.max_tries
        };
        if !within_tries || !turkish::is_lowercase_word(&saved.target_word) {
            warn!("Saved game is out of bounds for this mode, starting fresh");
            return;
        }

        let mut keyboard = KeyboardStatus::new();
        for guess in &saved.guesses {
            keyboard.record(&guess.word, &guess.feedback);
        }

        self.state.target = saved.target_word;
        self.state.guesses = saved.guesses;
        self.state.cursor_row = saved.cursor_row;
        self.state.keyboard = keyboard;
        self.state.restored = true;
        self.state.phase = if saved.won {
            Phase::Won
        } else if saved.lost {
            Phase::Lost
        } else {
            Phase::Playing
        };
        info_log!("Restored saved game with {} guesses", self.state.guesses.len());
    }

    /// Single entry point for keyboard input.
    pub fn handle_key_press(&mut self, key: Key) -> KeyOutcome {
        if self.state.phase != Phase::Playing {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Letter(c) => {
                let c = turkish::lower_char(c);
                let capacity = self.state.config.map_or(0, |c| c.row_capacity());
                if !turkish::is_lowercase_letter(c)
                    || self.state.processing
                    || self.state.row.len() >= capacity
                {
                    return KeyOutcome::Ignored;
                }
                self.state.row.push(c);
                KeyOutcome::Typed(c)
            }
            Key::Backspace => {
                if self.state.processing || self.state.row.pop().is_none() {
                    KeyOutcome::Ignored
                } else {
                    KeyOutcome::Erased
                }
            }
            Key::Enter => match self.submit_guess() {
                Ok(report) => KeyOutcome::Submitted(report),
                Err(SubmitError::Rejected(rejection)) => KeyOutcome::Rejected(rejection),
                Err(SubmitError::Aborted(e)) => KeyOutcome::Aborted(e),
            },
        }
    }

    /// Score the active row.
    ///
    /// # Errors
    /// [`SubmitError::Rejected`] leaves the state untouched.
    /// [`SubmitError::Aborted`] means the session was reset to mode selection.
    pub fn submit_guess(&mut self) -> Result<TurnReport, SubmitError> {
        if self.state.phase != Phase::Playing {
            return Err(Rejection::NotPlaying.into());
        }
        if self.state.processing {
            return Err(Rejection::Busy.into());
        }
        let Some(config) = self.state.config else {
            return Err(self.abort(SessionError::MissingTarget));
        };

        config.check_complete(self.state.row.len())?;

        if self.state.target.is_empty() {
            return Err(self.abort(SessionError::MissingTarget));
        }
        if !turkish::is_lowercase_word(&self.state.target) {
            let target = self.state.target.clone();
            return Err(self.abort(SessionError::MalformedTarget(target)));
        }

        self.state.processing = true;
        let guess = self.state.current_input();

        if !self.lexicon.contains_word(&guess) {
            self.state.processing = false;
            debug_log!("Rejected guess not in word list: {}", guess);
            return Err(Rejection::NotInWordList { word: guess }.into());
        }

        let feedback = evaluate(&guess, &self.state.target);
        let record = GuessRecord::new(&guess, feedback);
        self.state.keyboard.record(&record.word, &record.feedback);
        self.state.guesses.push(record.clone());
        self.state.row.clear();

        let row = self.state.cursor_row;
        if guess == self.state.target {
            self.state.phase = Phase::Won;
        } else if row + 1 == config.max_tries {
            self.state.phase = Phase::Lost;
        } else {
            self.state.cursor_row += 1;
        }
        debug_log!(
            "Guess {} on row {}: {}",
            guess,
            row,
            crate::feedback::feedback_code(&record.feedback)
        );

        let warning = self.persist(config).err();
        self.state.processing = false;

        Ok(TurnReport {
            record,
            row,
            keyboard: self.state.keyboard.clone(),
            phase: self.state.phase,
            warning,
        })
    }

    fn persist(&mut self, config: SessionConfig) -> Result<(), String> {
        let snapshot = GameState {
            schema_version: SCHEMA_VERSION,
            mode: config.mode,
            target_word: self.state.target.clone(),
            guesses: self.state.guesses.clone(),
            cursor_row: self.state.cursor_row,
            won: self.state.phase == Phase::Won,
            lost: self.state.phase == Phase::Lost,
            date: self.state.date.clone(),
            length: self.state.word_length,
        };
        self.store
            .save(&snapshot, config.save_slot())
            .map_err(|e| {
                warn!("Could not save game state: {e}");
                SAVE_FAILED_MESSAGE.to_string()
            })
    }

    fn abort(&mut self, e: SessionError) -> SubmitError {
        error!("Session aborted: {e:?}");
        self.reset();
        SubmitError::Aborted(e)
    }

    /// End-of-game data, or `None` while the game is still running.
    pub fn summary(&self) -> Option<GameSummary> {
        let config = self.state.config?;
        if !self.state.phase.is_over() {
            return None;
        }
        let won = self.state.phase == Phase::Won;
        let attempts = self.state.guesses.len();
        let score = if won {
            attempts.to_string()
        } else {
            "X".to_string()
        };
        let mut share = format!("{} {score}/{}", config.mode.title(), config.max_tries);
        for guess in &self.state.guesses {
            share.push('\n');
            share.extend(guess.feedback.iter().map(|f| Feedback::emoji(*f)));
        }
        Some(GameSummary {
            mode: config.mode,
            won,
            attempts,
            max_tries: config.max_tries,
            target: self.state.target.clone(),
            share,
        })
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}
