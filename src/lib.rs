// Library interface for turkce-wordle
// The binary and the integration tests both go through these modules

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod feedback;
pub mod game_state;
pub mod interface;
pub mod logging;
pub mod selector;
pub mod session;
pub mod store;
pub mod tui;
pub mod turkish;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use feedback::{Feedback, KeyboardStatus, evaluate};
pub use game_state::{GameState, GuessRecord};
pub use interface::{GameInterface, UserAction, game_loop};
pub use session::{Key, Mode, Phase, SessionController};
pub use store::{GameStore, MemoryStorage};
pub use wordbank::{Lexicon, load_wordbank_from_file, load_wordbank_from_str};
