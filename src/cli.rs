use clap::Parser;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::debug_log;
use crate::feedback::{Feedback, KeyboardStatus, feedback_code};
use crate::game_state::GuessRecord;
use crate::interface::{GameInterface, MessageKind, UserAction, game_over_text, length_label};
use crate::selector::SelectionPolicy;
use crate::session::{GameSummary, Mode, Phase, SessionState, StartReport, TurnReport};
use crate::turkish;

/// Turkish Wordle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Word list: a newline-delimited file or an http(s) URL
    #[arg(short = 'i', long = "wordlist")]
    pub wordlist: Option<String>,

    /// Start straight into a mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Classic word length (4-9)
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Line-based interface instead of the full-screen one
    #[arg(long)]
    pub plain: bool,

    /// Keep games in memory only
    #[arg(long)]
    pub no_save: bool,

    /// Directory for saved games
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// How the target word is derived from the clock
    #[arg(long, value_enum)]
    pub policy: Option<SelectionPolicy>,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Debug, PartialEq, Eq)]
enum LineCommand {
    Exit,
    NewGame,
    Text(String),
}

fn parse_command(line: &str) -> LineCommand {
    let trimmed = line.trim();
    match turkish::lower(trimmed).as_str() {
        "çık" | "cik" | "exit" | "q" => LineCommand::Exit,
        "yeni" | "next" => LineCommand::NewGame,
        _ => LineCommand::Text(trimmed.to_string()),
    }
}

fn parse_mode(input: &str) -> Option<Mode> {
    match turkish::lower(input).as_str() {
        "1" | "klasik" | "classic" => Some(Mode::Classic),
        "2" | "dinamik" | "dynamic" | "4-9" => Some(Mode::Dynamic),
        _ => None,
    }
}

/// `K A L E M   🟩🟨⬛⬛🟩  GYXXG`
fn format_row(record: &GuessRecord) -> String {
    let letters: Vec<String> = record
        .word
        .chars()
        .map(|c| turkish::upper_char(c).to_string())
        .collect();
    let tiles: String = record.feedback.iter().map(|f| f.emoji()).collect();
    format!(
        "{}   {}  {}",
        letters.join(" "),
        tiles,
        feedback_code(&record.feedback)
    )
}

/// Keyboard rows with `[C]` correct, `(C)` present and ` · ` absent.
fn format_keyboard(status: &KeyboardStatus) -> Vec<String> {
    turkish::KEYBOARD_ROWS
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match status.get(c) {
                    Some(Feedback::Correct) => format!("[{c}]"),
                    Some(Feedback::Present) => format!("({c})"),
                    Some(Feedback::Absent) => " · ".to_string(),
                    None => format!(" {c} "),
                })
                .collect()
        })
        .collect()
}

/// Line-based [`GameInterface`]: one command or word per line.
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn say(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.writer, "{text}") {
            debug_log!("CLI write failed: {}", e);
        }
    }

    /// `None` at end of input or on a read error.
    fn read_line(&mut self) -> Option<String> {
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                log::warn!("Could not read input: {e}");
                None
            }
        }
    }

    fn prompt(&mut self, state: &SessionState, lengths: &[usize]) {
        match state.phase() {
            Phase::ModeSelect if lengths.is_empty() => {
                self.say("\nSözlük yüklenemedi. 'tekrar' ile yeniden deneyin, 'çık' ile çıkış:");
            }
            Phase::ModeSelect => {
                self.say("\nMod seçin: 1) Klasik Wordle  2) 4-9 Oyunu  ('çık' ile çıkış)");
            }
            Phase::LengthSelect => {
                let options: Vec<String> = lengths.iter().map(ToString::to_string).collect();
                self.say(format!(
                    "\nKelime uzunluğu seçin ({}), 'yeni' ile geri:",
                    options.join(", ")
                ));
            }
            Phase::Playing => {
                let letters = match state.mode() {
                    Some(Mode::Classic) => format!("{} harf", state.word_length()),
                    _ => "4-9 harf".to_string(),
                };
                self.say(format!(
                    "\nTahmin {}/{} ({letters}), 'yeni' ile yeni oyun, 'çık' ile çıkış:",
                    state.cursor_row() + 1,
                    state.max_tries()
                ));
            }
            Phase::Won | Phase::Lost => {
                self.say("\n'yeni' ile yeni oyun, 'çık' ile çıkış:");
            }
        }
    }

    fn show_keyboard(&mut self, status: &KeyboardStatus) {
        for line in format_keyboard(status) {
            self.say(line);
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn read_action(&mut self, state: &SessionState, lengths: &[usize]) -> Option<UserAction> {
        self.prompt(state, lengths);
        let Some(line) = self.read_line() else {
            return Some(UserAction::Exit);
        };

        let text = match parse_command(&line) {
            LineCommand::Exit => return Some(UserAction::Exit),
            LineCommand::NewGame => return Some(UserAction::NewGame),
            LineCommand::Text(text) => text,
        };

        match state.phase() {
            Phase::ModeSelect if matches!(turkish::lower(&text).as_str(), "tekrar" | "retry") => {
                Some(UserAction::Retry)
            }
            Phase::ModeSelect => {
                let mode = parse_mode(&text);
                if mode.is_none() {
                    self.say("Geçersiz seçim. 1 veya 2 girin.");
                }
                mode.map(UserAction::SelectMode)
            }
            Phase::LengthSelect => match text.parse::<usize>() {
                Ok(length) => Some(UserAction::SelectLength(length)),
                Err(_) => {
                    self.say("Lütfen kelime uzunluğunu seçin.");
                    None
                }
            },
            Phase::Playing if text.is_empty() => None,
            Phase::Playing => Some(UserAction::Word(text)),
            Phase::Won | Phase::Lost => None,
        }
    }

    fn display_session_started(&mut self, report: &StartReport, state: &SessionState) {
        self.say(format!(
            "\n{} - {} - {} deneme hakkı",
            report.mode.title(),
            length_label(report.mode, report.word_length),
            report.max_tries
        ));
        self.say(format!("Sözlükte {} kelime var.", report.word_count));
        if report.restored {
            self.say("Kaydedilmiş oyun yüklendi.");
            for record in state.guesses() {
                self.say(format_row(record));
            }
            self.show_keyboard(state.keyboard());
        }
    }

    fn display_turn(&mut self, report: &TurnReport, _state: &SessionState) {
        self.say(format_row(&report.record));
        self.show_keyboard(&report.keyboard);
    }

    fn display_message(&mut self, message: &str, kind: MessageKind) {
        match kind {
            MessageKind::Info => self.say(message),
            MessageKind::Warning => self.say(format!("Uyarı: {message}")),
            MessageKind::Error => self.say(format!("! {message}")),
        }
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        let (title, message) = game_over_text(summary);
        self.say(format!("\n{title} {message}"));
        self.say(format!("Doğru kelime: {}", turkish::upper(&summary.target)));
        self.say(format!("\n{}", summary.share));
    }

    fn display_exit_message(&mut self) {
        self.say("Çıkılıyor.");
    }
}
