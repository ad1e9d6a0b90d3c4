//! Presentation seam between the session controller and a frontend.
//!
//! A frontend implements [`GameInterface`]; [`game_loop`] pulls actions from it,
//! feeds them to the controller and hands the results back for display.

use crate::clock::Clock;
use crate::error::{Rejection, SetupError};
use crate::session::{
    GameSummary, Key, KeyOutcome, Mode, Phase, SessionController, SessionState, StartReport,
    TurnReport,
};
use crate::store::KeyValueStorage;
use crate::turkish;
use crate::{debug_log, info_log};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SelectMode(Mode),
    SelectLength(usize),
    /// One key press, as from an on-screen keyboard.
    Key(Key),
    /// A whole word typed at once (line-based frontends). Replaces the
    /// active row and submits it.
    Word(String),
    /// Abandon the session and go back to mode selection.
    NewGame,
    /// Reload the word list after it failed to load.
    Retry,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

pub trait GameInterface {
    /// Block until the user does something. `None` means the input was not
    /// an action (already reported by the frontend) and the loop should ask
    /// again.
    fn read_action(&mut self, state: &SessionState, lengths: &[usize]) -> Option<UserAction>;
    fn display_session_started(&mut self, report: &StartReport, state: &SessionState);
    fn display_turn(&mut self, report: &TurnReport, state: &SessionState);
    fn display_message(&mut self, message: &str, kind: MessageKind);
    fn display_game_over(&mut self, summary: &GameSummary);
    fn display_exit_message(&mut self);
}

/// Initial mode/length picked on the command line or in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preset {
    pub mode: Option<Mode>,
    pub length: Option<usize>,
}

/// Header line for the board.
#[must_use]
pub fn length_label(mode: Mode, length: usize) -> String {
    match mode {
        Mode::Classic => format!("{length} Harfli Kelime"),
        Mode::Dynamic => "Hedef Uzunluğu Bilinmiyor".to_string(),
    }
}

/// Title and body of the end-of-game message.
#[must_use]
pub fn game_over_text(summary: &GameSummary) -> (&'static str, String) {
    if summary.won {
        (
            "Tebrikler!",
            format!("Kelimeyi {} denemede buldunuz.", summary.attempts),
        )
    } else if summary.mode == Mode::Dynamic && summary.attempts >= summary.max_tries {
        ("Oyun Bitti!", "Deneme hakkınız bitti.".to_string())
    } else {
        ("Oyun Bitti!", "Bu sefer olmadı. Denemeye devam!".to_string())
    }
}

pub fn game_loop<S, C, I>(controller: &mut SessionController<S, C>, ui: &mut I, preset: Preset)
where
    S: KeyValueStorage,
    C: Clock,
    I: GameInterface,
{
    info_log!("Game loop started with {} words", controller.lexicon().len());
    match controller.setup_error() {
        Some(error) => {
            let message = format!("{} ({error})", SetupError::WordListUnavailable);
            ui.display_message(&message, MessageKind::Error);
        }
        None => apply_preset(controller, ui, preset),
    }

    loop {
        let lengths = controller.available_lengths();
        let Some(action) = ui.read_action(controller.state(), &lengths) else {
            continue;
        };
        debug_log!("User action: {:?}", action);

        match action {
            UserAction::Exit => {
                ui.display_exit_message();
                break;
            }
            UserAction::NewGame => controller.reset(),
            UserAction::Retry => match controller.retry_setup() {
                Ok(count) => ui.display_message(
                    &format!("Sözlük yüklendi: {count} kelime."),
                    MessageKind::Info,
                ),
                Err(e) => ui.display_message(
                    &format!("{} ({e})", SetupError::WordListUnavailable),
                    MessageKind::Error,
                ),
            },
            UserAction::SelectMode(mode) => match controller.select_mode(mode) {
                Ok(Phase::LengthSelect) => {}
                Ok(_) => announce_start(controller, ui),
                Err(e) => ui.display_message(&e.to_string(), MessageKind::Error),
            },
            UserAction::SelectLength(length) => match controller.select_length(length) {
                Ok(_) => announce_start(controller, ui),
                Err(e) => ui.display_message(&e.to_string(), MessageKind::Error),
            },
            UserAction::Key(key) => {
                let outcome = controller.handle_key_press(key);
                show_outcome(controller, ui, outcome);
            }
            UserAction::Word(word) => submit_word(controller, ui, &word),
        }
    }
}

fn apply_preset<S, C, I>(controller: &mut SessionController<S, C>, ui: &mut I, preset: Preset)
where
    S: KeyValueStorage,
    C: Clock,
    I: GameInterface,
{
    let Some(mode) = preset.mode else {
        return;
    };
    match controller.select_mode(mode) {
        Ok(Phase::LengthSelect) => {
            if let Some(length) = preset.length {
                match controller.select_length(length) {
                    Ok(_) => announce_start(controller, ui),
                    Err(e) => ui.display_message(&e.to_string(), MessageKind::Error),
                }
            }
        }
        Ok(_) => announce_start(controller, ui),
        Err(e) => ui.display_message(&e.to_string(), MessageKind::Error),
    }
}

fn announce_start<S, C, I>(controller: &SessionController<S, C>, ui: &mut I)
where
    S: KeyValueStorage,
    C: Clock,
    I: GameInterface,
{
    let state = controller.state();
    let (Some(mode), Some(config)) = (state.mode(), state.config()) else {
        return;
    };
    let report = StartReport {
        mode,
        word_length: state.word_length(),
        max_tries: config.max_tries,
        restored: state.restored(),
        word_count: controller.lexicon().len(),
    };
    ui.display_session_started(&report, state);
    if let Some(summary) = controller.summary() {
        ui.display_game_over(&summary);
    }
}

fn show_outcome<S, C, I>(controller: &SessionController<S, C>, ui: &mut I, outcome: KeyOutcome)
where
    S: KeyValueStorage,
    C: Clock,
    I: GameInterface,
{
    match outcome {
        KeyOutcome::Typed(_) | KeyOutcome::Erased | KeyOutcome::Ignored => {}
        KeyOutcome::Submitted(report) => {
            ui.display_turn(&report, controller.state());
            if let Some(warning) = &report.warning {
                ui.display_message(warning, MessageKind::Warning);
            }
            if let Some(summary) = controller.summary() {
                ui.display_game_over(&summary);
            }
        }
        KeyOutcome::Rejected(rejection) => {
            ui.display_message(&rejection.to_string(), MessageKind::Error);
        }
        KeyOutcome::Aborted(e) => ui.display_message(&e.to_string(), MessageKind::Error),
    }
}

/// Replay a typed word as key presses: clear the row, type, press Enter.
fn submit_word<S, C, I>(controller: &mut SessionController<S, C>, ui: &mut I, word: &str)
where
    S: KeyValueStorage,
    C: Clock,
    I: GameInterface,
{
    if controller.state().phase() != Phase::Playing {
        ui.display_message(&Rejection::NotPlaying.to_string(), MessageKind::Error);
        return;
    }

    let mut keys = Vec::new();
    for c in word.trim().chars() {
        match Key::from_char(c) {
            Some(key) => keys.push(key),
            None => {
                ui.display_message(
                    &format!("Sadece harf girebilirsiniz! ('{c}' bir harf değil)"),
                    MessageKind::Error,
                );
                return;
            }
        }
    }
    let capacity = controller
        .state()
        .config()
        .map_or(0, |c| c.row_capacity());
    if keys.len() > capacity {
        ui.display_message(
            &format!("En fazla {capacity} harf girebilirsiniz!"),
            MessageKind::Error,
        );
        return;
    }

    while !controller.state().current_row().is_empty() {
        controller.handle_key_press(Key::Backspace);
    }
    for key in keys {
        controller.handle_key_press(key);
    }
    let outcome = controller.handle_key_press(Key::Enter);
    debug_log!(
        "Word '{}' submitted: {:?}",
        turkish::upper(word.trim()),
        outcome
    );
    show_outcome(controller, ui, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::selector::SelectionPolicy;
    use crate::store::MemoryStorage;
    use crate::wordbank::load_wordbank_from_str;
    use chrono::NaiveDate;
    use std::collections::VecDeque;

    /// Replays a fixed list of actions and records what it was asked to show.
    #[derive(Default)]
    struct ScriptedInterface {
        actions: VecDeque<UserAction>,
        started: Vec<StartReport>,
        turns: Vec<TurnReport>,
        messages: Vec<(String, MessageKind)>,
        summaries: Vec<GameSummary>,
        exited: bool,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<UserAction>) -> Self {
            Self {
                actions: actions.into(),
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn read_action(&mut self, _state: &SessionState, _lengths: &[usize]) -> Option<UserAction> {
            Some(self.actions.pop_front().unwrap_or(UserAction::Exit))
        }

        fn display_session_started(&mut self, report: &StartReport, _state: &SessionState) {
            self.started.push(*report);
        }

        fn display_turn(&mut self, report: &TurnReport, _state: &SessionState) {
            self.turns.push(report.clone());
        }

        fn display_message(&mut self, message: &str, kind: MessageKind) {
            self.messages.push((message.to_string(), kind));
        }

        fn display_game_over(&mut self, summary: &GameSummary) {
            self.summaries.push(summary.clone());
        }

        fn display_exit_message(&mut self) {
            self.exited = true;
        }
    }

    fn controller() -> SessionController<MemoryStorage, FixedClock> {
        let lexicon = load_wordbank_from_str("kalem\nkitap\nçiçek\nşeker\ndeniz\nmasa\nelma\n").unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        SessionController::new(lexicon, MemoryStorage::new(), FixedClock(at), SelectionPolicy::Daily)
            .with_seed(3)
    }

    #[test]
    fn test_immediate_exit() {
        let mut c = controller();
        let mut ui = ScriptedInterface::new(vec![UserAction::Exit]);
        game_loop(&mut c, &mut ui, Preset::default());
        assert!(ui.exited);
        assert!(ui.started.is_empty());
    }

    #[test]
    fn test_classic_win_through_words() {
        // Jan 1 2024, length 5: index 0 → "kalem"
        let mut c = controller();
        let mut ui = ScriptedInterface::new(vec![
            UserAction::SelectMode(Mode::Classic),
            UserAction::SelectLength(5),
            UserAction::Word("KİTAP".to_string()),
            UserAction::Word("kalem".to_string()),
        ]);
        game_loop(&mut c, &mut ui, Preset::default());

        assert_eq!(ui.started.len(), 1);
        assert_eq!(ui.started[0].word_length, 5);
        assert_eq!(ui.turns.len(), 2);
        assert_eq!(ui.turns[0].record.word, "kitap");
        assert_eq!(ui.summaries.len(), 1);
        assert!(ui.summaries[0].won);
        assert_eq!(ui.summaries[0].attempts, 2);
        assert!(ui.exited);
    }

    #[test]
    fn test_rejections_are_reported() {
        let mut c = controller();
        let mut ui = ScriptedInterface::new(vec![
            UserAction::Word("kalem".to_string()),
            UserAction::SelectMode(Mode::Classic),
            UserAction::SelectLength(8),
            UserAction::SelectLength(5),
            UserAction::Word("kal".to_string()),
            UserAction::Word("zzzzz".to_string()),
            UserAction::Word("kal3m".to_string()),
            UserAction::Word("kalemler".to_string()),
        ]);
        game_loop(&mut c, &mut ui, Preset::default());

        let messages: Vec<&str> = ui.messages.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(messages[0], "Şu anda tahmin yapılamaz.");
        assert_eq!(messages[1], "Lütfen geçerli bir kelime uzunluğu seçin.");
        assert_eq!(messages[2], "Kelime yeterince uzun değil!");
        assert_eq!(messages[3], "Kelime sözlükte yok!");
        assert!(messages[4].starts_with("Sadece harf"));
        assert_eq!(messages[5], "En fazla 5 harf girebilirsiniz!");
        assert!(ui.messages.iter().all(|(_, kind)| *kind == MessageKind::Error));
        assert!(ui.turns.is_empty());
    }

    #[test]
    fn test_key_presses_reach_controller() {
        let mut c = controller();
        let mut actions = vec![
            UserAction::SelectMode(Mode::Classic),
            UserAction::SelectLength(4),
        ];
        actions.extend("masa".chars().map(|ch| UserAction::Key(Key::Letter(ch))));
        actions.push(UserAction::Key(Key::Enter));
        let mut ui = ScriptedInterface::new(actions);
        game_loop(&mut c, &mut ui, Preset::default());

        assert_eq!(ui.turns.len(), 1);
        assert_eq!(ui.turns[0].record.word, "masa");
    }

    #[test]
    fn test_preset_starts_session() {
        let mut c = controller();
        let mut ui = ScriptedInterface::new(vec![]);
        let preset = Preset {
            mode: Some(Mode::Classic),
            length: Some(5),
        };
        game_loop(&mut c, &mut ui, preset);
        assert_eq!(ui.started.len(), 1);
        assert_eq!(c.state().phase(), Phase::Playing);
    }

    #[test]
    fn test_new_game_returns_to_mode_select() {
        let mut c = controller();
        let mut ui = ScriptedInterface::new(vec![
            UserAction::SelectMode(Mode::Dynamic),
            UserAction::NewGame,
        ]);
        game_loop(&mut c, &mut ui, Preset::default());
        assert_eq!(ui.started.len(), 1);
        assert_eq!(ui.started[0].mode, Mode::Dynamic);
        assert_eq!(c.state().phase(), Phase::ModeSelect);
    }

    #[test]
    fn test_game_over_text() {
        let mut summary = GameSummary {
            mode: Mode::Dynamic,
            won: false,
            attempts: 10,
            max_tries: 10,
            target: "masa".to_string(),
            share: String::new(),
        };
        assert_eq!(game_over_text(&summary).1, "Deneme hakkınız bitti.");
        summary.mode = Mode::Classic;
        assert_eq!(game_over_text(&summary).1, "Bu sefer olmadı. Denemeye devam!");
        summary.won = true;
        summary.attempts = 3;
        assert_eq!(game_over_text(&summary), ("Tebrikler!", "Kelimeyi 3 denemede buldunuz.".to_string()));
        assert_eq!(length_label(Mode::Classic, 6), "6 Harfli Kelime");
    }
}
