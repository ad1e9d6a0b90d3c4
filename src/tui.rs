//! TUI (Terminal User Interface) frontend
//!
//! Full-screen board built on Ratatui. Draws the guess grid, the Turkish
//! keyboard coloured by best letter status, and short-lived messages.
//!
//! # Reveal
//! A scored row is uncovered one tile at a time: each tile starts flipping
//! `reveal_delay` after the previous one and shows its colour halfway through
//! a `FLIP_DURATION_MS` flip. Keys are swallowed until the last flip ends;
//! the keyboard keeps its previous colours until then.

use crate::feedback::{Feedback, KeyboardStatus};
use crate::interface::{GameInterface, MessageKind, UserAction, game_over_text, length_label};
use crate::session::{GameSummary, Key, Mode, Phase, SessionState, StartReport, TurnReport};
use crate::turkish;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::{Duration, Instant};

const EVENT_POLL_TIMEOUT_MS: u64 = 50;
const FLIP_DURATION_MS: u64 = 500;
const MESSAGE_DURATION_MS: u64 = 2000;
const WARNING_DURATION_MS: u64 = 3000;
const SHAKE_DURATION_MS: u64 = 500;
const ROW_SPACING: u16 = 1;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const MODES: [Mode; 2] = [Mode::Classic, Mode::Dynamic];

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

/// Per-tile delay of the reveal; longer words reveal faster.
#[must_use]
pub fn reveal_delay(length: usize) -> Duration {
    let ms = if length >= 9 {
        50
    } else if length >= 7 {
        75
    } else {
        100
    };
    Duration::from_millis(ms)
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum TileState {
    Empty,
    Typed,
    Rejected,
    Scored(Feedback),
}

impl TileState {
    /// (background, foreground)
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Empty => (Color::Black, Color::DarkGray),
            Self::Typed => (Color::DarkGray, Color::White),
            Self::Rejected => (Color::Red, Color::White),
            Self::Scored(Feedback::Correct) => (Color::Green, Color::Black),
            Self::Scored(Feedback::Present) => (Color::Yellow, Color::Black),
            Self::Scored(Feedback::Absent) => (Color::Gray, Color::White),
        }
    }

    fn for_key(status: Option<Feedback>) -> Self {
        status.map_or(Self::Typed, Self::Scored)
    }
}

type Tile = (char, TileState);

/// An in-progress row reveal.
#[derive(Debug)]
struct Reveal {
    row: usize,
    tiles: usize,
    started: Instant,
    tile_delay: Duration,
    keyboard_before: KeyboardStatus,
}

impl Reveal {
    /// How many tiles of the row show their colour at `now`.
    #[allow(clippy::cast_possible_truncation)]
    fn revealed(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started);
        let half_flip = Duration::from_millis(FLIP_DURATION_MS / 2);
        if elapsed < half_flip {
            return 0;
        }
        let steps = (elapsed - half_flip).as_millis() / self.tile_delay.as_millis().max(1);
        (steps as usize + 1).min(self.tiles)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn finished(&self, now: Instant) -> bool {
        let last_start = self.tile_delay * self.tiles.saturating_sub(1) as u32;
        now.saturating_duration_since(self.started)
            >= last_start + Duration::from_millis(FLIP_DURATION_MS)
    }
}

#[derive(Debug)]
struct Toast {
    text: String,
    kind: MessageKind,
    expires: Instant,
}

/// Tiles for every row of the board at `now`.
fn board_rows(state: &SessionState, reveal: Option<&Reveal>, now: Instant, shake: bool) -> Vec<Vec<Tile>> {
    let width = state.config().map_or(0, |c| c.row_capacity());
    let pad = |mut tiles: Vec<Tile>| {
        while tiles.len() < width {
            tiles.push((' ', TileState::Empty));
        }
        tiles
    };

    (0..state.max_tries())
        .map(|i| {
            if let Some(record) = state.guesses().get(i) {
                let shown = match reveal {
                    Some(r) if r.row == i => r.revealed(now),
                    _ => usize::MAX,
                };
                let tiles = record
                    .word
                    .chars()
                    .zip(&record.feedback)
                    .enumerate()
                    .map(|(j, (c, &f))| {
                        let tile = if j < shown {
                            TileState::Scored(f)
                        } else {
                            TileState::Typed
                        };
                        (turkish::upper_char(c), tile)
                    })
                    .collect();
                pad(tiles)
            } else if i == state.cursor_row() && state.phase() == Phase::Playing {
                let tile = if shake {
                    TileState::Rejected
                } else {
                    TileState::Typed
                };
                let tiles = state
                    .current_row()
                    .iter()
                    .map(|&c| (turkish::upper_char(c), tile))
                    .collect();
                pad(tiles)
            } else {
                pad(Vec::new())
            }
        })
        .collect()
}

fn tile_spans(tiles: &[Tile]) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("  ")];
    for &(letter, state) in tiles {
        let (bg, fg) = state.colors();
        spans.push(Span::styled(
            format!(" {letter} "),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// On-screen keyboard, the bottom row framed by ENTER and ⌫.
fn keyboard_lines(status: &KeyboardStatus) -> Vec<Line<'static>> {
    let last = turkish::KEYBOARD_ROWS.len() - 1;
    turkish::KEYBOARD_ROWS
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = Vec::new();
            if i == last {
                spans.push(Span::styled("ENTER ", INFO_STYLE));
            }
            for c in row.chars() {
                let (bg, fg) = TileState::for_key(status.get(c)).colors();
                spans.push(Span::styled(format!(" {c} "), Style::default().fg(fg).bg(bg)));
                spans.push(Span::raw(" "));
            }
            if i == last {
                spans.push(Span::styled("⌫", INFO_STYLE));
            }
            Line::from(spans)
        })
        .collect()
}

/// Everything one frame needs.
struct RenderContext<'a> {
    state: &'a SessionState,
    lengths: &'a [usize],
    menu_index: usize,
    reveal: Option<&'a Reveal>,
    toast: Option<&'a Toast>,
    game_over: Option<&'a GameSummary>,
    shake: bool,
    now: Instant,
}

fn render_frame(f: &mut Frame, ctx: &RenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Board or menu
            Constraint::Length(5), // Keyboard
            Constraint::Length(5), // Messages
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0], ctx.state);
    match ctx.state.phase() {
        Phase::ModeSelect => {
            let items: Vec<String> = MODES.iter().map(|m| m.title().to_string()).collect();
            render_menu(f, chunks[1], "Oyun Modu", &items, ctx.menu_index);
        }
        Phase::LengthSelect => {
            let items: Vec<String> = ctx.lengths.iter().map(|n| format!("{n} harf")).collect();
            render_menu(f, chunks[1], "Kelime Uzunluğu", &items, ctx.menu_index);
        }
        Phase::Playing | Phase::Won | Phase::Lost => render_board(f, chunks[1], ctx),
    }
    let keyboard = ctx
        .reveal
        .map_or(ctx.state.keyboard(), |r| &r.keyboard_before);
    render_keyboard(f, chunks[2], keyboard);
    render_messages(f, chunks[3], ctx);
    render_instructions(f, chunks[4], ctx.state.phase(), ctx.lengths.is_empty());
}

fn render_title(f: &mut Frame, area: Rect, state: &SessionState) {
    let text = match state.mode() {
        Some(mode) if state.phase() != Phase::ModeSelect => {
            format!("{}  ·  {}", mode.title(), length_label(mode, state.word_length()))
        }
        _ => "TÜRKÇE WORDLE".to_string(),
    };
    let title = Paragraph::new(text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_menu(f: &mut Frame, area: Rect, title: &str, items: &[String], selected: usize) {
    let mut lines = vec![Line::from("")];
    for (i, item) in items.iter().enumerate() {
        if i == selected {
            lines.push(Line::from(Span::styled(format!(" > {item} "), SELECTED_STYLE)));
        } else {
            lines.push(Line::from(format!("   {item} ")));
        }
    }
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

#[allow(clippy::cast_possible_truncation)]
fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let block = Block::default()
        .title(format!("Tahminler ({})", ctx.state.max_tries()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = board_rows(ctx.state, ctx.reveal, ctx.now, ctx.shake);

    // Keep the active row visible when the board does not fit.
    let available_rows = (inner.height / ROW_SPACING) as usize;
    let focus_row = ctx.state.cursor_row() + 1;
    let skip_count = focus_row.saturating_sub(available_rows);

    for (display_index, tiles) in rows.iter().skip(skip_count).enumerate() {
        let y = inner.y + display_index as u16 * ROW_SPACING;
        if y >= inner.y + inner.height {
            break;
        }
        let line = Line::from(tile_spans(tiles));
        f.render_widget(
            Paragraph::new(line),
            Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: 1,
            },
        );
    }
}

fn render_keyboard(f: &mut Frame, area: Rect, status: &KeyboardStatus) {
    let paragraph = Paragraph::new(keyboard_lines(status))
        .block(Block::default().title("Klavye").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, area: Rect, ctx: &RenderContext) {
    let mut lines = Vec::new();

    if let (Some(summary), None) = (ctx.game_over, ctx.reveal) {
        let (title, message) = game_over_text(summary);
        let style = if summary.won {
            SUCCESS_STYLE
        } else {
            ERROR_STYLE
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{title} "), style),
            Span::raw(message),
        ]));
        lines.push(Line::from(vec![
            Span::raw("Doğru kelime: "),
            Span::styled(turkish::upper(&summary.target), INFO_STYLE),
        ]));
    }

    if let Some(toast) = ctx.toast {
        let style = match toast.kind {
            MessageKind::Info => MESSAGE_STYLE,
            MessageKind::Warning => INFO_STYLE,
            MessageKind::Error => ERROR_STYLE,
        };
        lines.push(Line::from(Span::styled(toast.text.clone(), style)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Mesajlar").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, phase: Phase, no_words: bool) {
    let text = match phase {
        Phase::ModeSelect if no_words => "R: Sözlüğü yeniden yükle | ESC: Çıkış",
        Phase::ModeSelect => "↑/↓ veya 1/2: Mod seç | ENTER: Başla | ESC: Çıkış",
        Phase::LengthSelect => "↑/↓ veya 4-9: Uzunluk seç | ENTER: Başla | ESC: Geri",
        Phase::Playing => "Harfleri yazın | ENTER: Tahmin et | BACKSPACE: Sil | ESC: Menü",
        Phase::Won | Phase::Lost => "N veya ENTER: Yeni oyun | ESC: Menü | Q: Çıkış",
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Full-screen [`GameInterface`].
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    menu_index: usize,
    reveal: Option<Reveal>,
    toast: Option<Toast>,
    game_over: Option<GameSummary>,
    shake_until: Option<Instant>,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            menu_index: 0,
            reveal: None,
            toast: None,
            game_over: None,
            shake_until: None,
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Expire finished animations and messages.
    fn tick(&mut self, state: &SessionState, now: Instant) {
        if self.reveal.as_ref().is_some_and(|r| r.finished(now)) {
            debug_log!("Reveal finished");
            self.reveal = None;
        }
        if self.toast.as_ref().is_some_and(|t| now >= t.expires) {
            self.toast = None;
        }
        if self.shake_until.is_some_and(|until| now >= until) {
            self.shake_until = None;
        }
        if !state.phase().is_over() {
            self.game_over = None;
        }
    }

    fn draw(&mut self, state: &SessionState, lengths: &[usize], now: Instant) -> Result<(), io::Error> {
        let ctx = RenderContext {
            state,
            lengths,
            menu_index: self.menu_index,
            reveal: self.reveal.as_ref(),
            toast: self.toast.as_ref(),
            game_over: self.game_over.as_ref(),
            shake: self.shake_until.is_some(),
            now,
        };
        self.terminal.draw(|f| render_frame(f, &ctx))?;
        Ok(())
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    /// Characters produced by terminal escape sequences (e.g. on alt-tab).
    fn is_garbage_char(c: char) -> bool {
        c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD
    }

    fn move_menu(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.menu_index = 0;
            return;
        }
        self.menu_index = self.menu_index.saturating_add_signed(delta).min(len - 1);
    }

    fn handle_key(&mut self, key: KeyEvent, state: &SessionState, lengths: &[usize]) -> Option<UserAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(UserAction::Exit);
        }
        if Self::has_modifier_keys(&key) {
            debug_log!("handle_key() - Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }
        if let KeyCode::Char(c) = key.code
            && Self::is_garbage_char(c)
        {
            return None;
        }

        match state.phase() {
            Phase::ModeSelect => self.handle_mode_select(key),
            Phase::LengthSelect => self.handle_length_select(key, lengths),
            Phase::Playing => Self::handle_playing(key),
            Phase::Won | Phase::Lost => Self::handle_game_over(key),
        }
    }

    fn handle_mode_select(&mut self, key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Up | KeyCode::Left => self.move_menu(-1, MODES.len()),
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => self.move_menu(1, MODES.len()),
            KeyCode::Char('1') => return Some(UserAction::SelectMode(Mode::Classic)),
            KeyCode::Char('2') => return Some(UserAction::SelectMode(Mode::Dynamic)),
            KeyCode::Enter => {
                return MODES.get(self.menu_index).copied().map(UserAction::SelectMode);
            }
            KeyCode::Char('r' | 'R') => return Some(UserAction::Retry),
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => return Some(UserAction::Exit),
            _ => {}
        }
        None
    }

    fn handle_length_select(&mut self, key: KeyEvent, lengths: &[usize]) -> Option<UserAction> {
        match key.code {
            KeyCode::Up | KeyCode::Left => self.move_menu(-1, lengths.len()),
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => self.move_menu(1, lengths.len()),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let length = c.to_digit(10).map(|d| d as usize)?;
                return Some(UserAction::SelectLength(length));
            }
            KeyCode::Enter => {
                return lengths.get(self.menu_index).copied().map(UserAction::SelectLength);
            }
            KeyCode::Esc | KeyCode::Backspace => return Some(UserAction::NewGame),
            _ => {}
        }
        None
    }

    fn handle_playing(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Enter => Some(UserAction::Key(Key::Enter)),
            KeyCode::Backspace => Some(UserAction::Key(Key::Backspace)),
            KeyCode::Esc => Some(UserAction::NewGame),
            KeyCode::Char(c) => match Key::from_char(c) {
                Some(key) => Some(UserAction::Key(key)),
                None => {
                    debug_log!("handle_playing() - Not a Turkish letter: {:?}", c);
                    None
                }
            },
            _ => None,
        }
    }

    fn handle_game_over(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') | KeyCode::Enter | KeyCode::Esc => Some(UserAction::NewGame),
            KeyCode::Char('q' | 'Q') => Some(UserAction::Exit),
            _ => None,
        }
    }
}

impl GameInterface for TuiInterface {
    fn read_action(&mut self, state: &SessionState, lengths: &[usize]) -> Option<UserAction> {
        loop {
            let now = Instant::now();
            self.tick(state, now);
            if let Err(e) = self.draw(state, lengths, now) {
                info_log!("read_action() - Draw failed ({}), returning Exit", e);
                return Some(UserAction::Exit);
            }

            match event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    info_log!("read_action() - Poll failed ({}), returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    info_log!("read_action() - Read failed ({}), returning Exit", e);
                    return Some(UserAction::Exit);
                }
            };
            // Only Press events; Release and Repeat would double the input.
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if self.reveal.is_some() {
                debug_log!("read_action() - Ignoring {:?} during reveal", key.code);
                continue;
            }
            if let Some(action) = self.handle_key(key, state, lengths) {
                if matches!(action, UserAction::NewGame | UserAction::SelectMode(_)) {
                    self.menu_index = 0;
                }
                return Some(action);
            }
        }
    }

    fn display_session_started(&mut self, report: &StartReport, _state: &SessionState) {
        self.menu_index = 0;
        self.reveal = None;
        self.game_over = None;
        self.shake_until = None;
        let text = if report.restored {
            "Kaydedilmiş oyun yüklendi.".to_string()
        } else {
            format!("Sözlükte {} kelime var.", report.word_count)
        };
        self.toast = Some(Toast {
            text,
            kind: MessageKind::Info,
            expires: Instant::now() + Duration::from_millis(MESSAGE_DURATION_MS),
        });
    }

    fn display_turn(&mut self, report: &TurnReport, state: &SessionState) {
        let mut keyboard_before = KeyboardStatus::new();
        for record in state.guesses().iter().take(report.row) {
            keyboard_before.record(&record.word, &record.feedback);
        }
        let tiles = report.record.word.chars().count();
        self.reveal = Some(Reveal {
            row: report.row,
            tiles,
            started: Instant::now(),
            tile_delay: reveal_delay(tiles),
            keyboard_before,
        });
    }

    fn display_message(&mut self, message: &str, kind: MessageKind) {
        let duration = match kind {
            MessageKind::Warning => WARNING_DURATION_MS,
            MessageKind::Info | MessageKind::Error => MESSAGE_DURATION_MS,
        };
        let now = Instant::now();
        if kind == MessageKind::Error {
            self.shake_until = Some(now + Duration::from_millis(SHAKE_DURATION_MS));
        }
        self.toast = Some(Toast {
            text: message.to_string(),
            kind,
            expires: now + Duration::from_millis(duration),
        });
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        info_log!("Game over: won={} attempts={}", summary.won, summary.attempts);
        self.game_over = Some(summary.clone());
    }

    fn display_exit_message(&mut self) {
        info_log!("Exiting TUI");
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::selector::SelectionPolicy;
    use crate::session::SessionController;
    use crate::store::MemoryStorage;
    use crate::wordbank::load_wordbank_from_str;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn playing_controller() -> SessionController<MemoryStorage, FixedClock> {
        let lexicon = load_wordbank_from_str("kalem\nkitap\nçiçek\nşeker\ndeniz\n").unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut c = SessionController::new(
            lexicon,
            MemoryStorage::new(),
            FixedClock(at),
            SelectionPolicy::Daily,
        );
        c.select_mode(Mode::Classic).unwrap();
        c.select_length(5).unwrap();
        c
    }

    fn reveal_of(tiles: usize, started: Instant) -> Reveal {
        Reveal {
            row: 0,
            tiles,
            started,
            tile_delay: reveal_delay(tiles),
            keyboard_before: KeyboardStatus::new(),
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_reveal_delay_by_length() {
        assert_eq!(reveal_delay(4), Duration::from_millis(100));
        assert_eq!(reveal_delay(6), Duration::from_millis(100));
        assert_eq!(reveal_delay(7), Duration::from_millis(75));
        assert_eq!(reveal_delay(8), Duration::from_millis(75));
        assert_eq!(reveal_delay(9), Duration::from_millis(50));
    }

    #[test]
    fn test_reveal_progress() {
        let start = Instant::now();
        let reveal = reveal_of(5, start);
        assert_eq!(reveal.revealed(start), 0);
        assert_eq!(reveal.revealed(start + Duration::from_millis(249)), 0);
        assert_eq!(reveal.revealed(start + Duration::from_millis(250)), 1);
        assert_eq!(reveal.revealed(start + Duration::from_millis(350)), 2);
        assert_eq!(reveal.revealed(start + Duration::from_millis(5000)), 5);

        // Last tile starts at 400 ms and flips for 500 ms.
        assert!(!reveal.finished(start + Duration::from_millis(899)));
        assert!(reveal.finished(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_board_rows_during_reveal() {
        let mut c = playing_controller();
        for ch in "kitap".chars() {
            c.handle_key_press(Key::Letter(ch));
        }
        c.submit_guess().unwrap();
        for ch in "ka".chars() {
            c.handle_key_press(Key::Letter(ch));
        }

        let start = Instant::now();
        let reveal = reveal_of(5, start);
        let rows = board_rows(c.state(), Some(&reveal), start + Duration::from_millis(260), false);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][0], ('K', TileState::Scored(Feedback::Correct)));
        assert_eq!(rows[0][1], ('İ', TileState::Typed));
        assert_eq!(rows[1][0], ('K', TileState::Typed));
        assert_eq!(rows[1][2], (' ', TileState::Empty));
        assert!(rows[2].iter().all(|&(_, t)| t == TileState::Empty));

        let rows = board_rows(c.state(), None, start, true);
        assert_eq!(rows[0][4], ('P', TileState::Scored(Feedback::Absent)));
        assert_eq!(rows[1][1], ('A', TileState::Rejected));
    }

    #[test]
    fn test_keyboard_lines_layout() {
        let lines = keyboard_lines(&KeyboardStatus::new());
        assert_eq!(lines.len(), 3);
        let last: String = lines[2].spans.iter().map(|s| s.content.to_string()).collect();
        assert!(last.starts_with("ENTER"));
        assert!(last.ends_with('⌫'));
        assert!(last.contains(" Ç "));
    }

    #[test]
    fn test_render_playing_frame() {
        let mut c = playing_controller();
        for ch in "kitap".chars() {
            c.handle_key_press(Key::Letter(ch));
        }
        c.submit_guess().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        let lengths = c.available_lengths();
        let toast = Toast {
            text: "Kelime sözlükte yok!".to_string(),
            kind: MessageKind::Error,
            expires: Instant::now(),
        };
        let ctx = RenderContext {
            state: c.state(),
            lengths: &lengths,
            menu_index: 0,
            reveal: None,
            toast: Some(&toast),
            game_over: None,
            shake: false,
            now: Instant::now(),
        };
        terminal.draw(|f| render_frame(f, &ctx)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Klasik Wordle"));
        assert!(text.contains("5 Harfli Kelime"));
        assert!(text.contains("K   İ   T   A   P"));
        assert!(text.contains("Kelime sözlükte yok!"));
    }

    #[test]
    fn test_render_mode_menu() {
        let lexicon = load_wordbank_from_str("kalem\n").unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let c = SessionController::new(lexicon, MemoryStorage::new(), FixedClock(at), SelectionPolicy::Daily);
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        let ctx = RenderContext {
            state: c.state(),
            lengths: &[5],
            menu_index: 1,
            reveal: None,
            toast: None,
            game_over: None,
            shake: false,
            now: Instant::now(),
        };
        terminal.draw(|f| render_frame(f, &ctx)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("TÜRKÇE WORDLE"));
        assert!(text.contains("   Klasik Wordle"));
        assert!(text.contains(" > 4-9 Oyunu"));
        assert!(text.contains("ENTER: Başla"));
    }

    #[test]
    fn test_mode_menu_offers_reload_without_words() {
        let state = SessionState::default();
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        let ctx = RenderContext {
            state: &state,
            lengths: &[],
            menu_index: 0,
            reveal: None,
            toast: None,
            game_over: None,
            shake: false,
            now: Instant::now(),
        };
        terminal.draw(|f| render_frame(f, &ctx)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("R: Sözlüğü yeniden yükle"));
        assert!(!text.contains("ENTER: Başla"));
    }
}
