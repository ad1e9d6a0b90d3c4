use std::io;

use anyhow::{Context, Result};
use log::{error, warn};

use turkce_wordle::cli::{CliInterface, parse_cli};
use turkce_wordle::clock::SystemClock;
use turkce_wordle::config::Config;
use turkce_wordle::error::LexiconError;
use turkce_wordle::info_log;
use turkce_wordle::interface::game_loop;
use turkce_wordle::logging::init_logging;
use turkce_wordle::session::SessionController;
use turkce_wordle::store::{FileStorage, KeyValueStorage, MemoryStorage};
use turkce_wordle::tui::TuiInterface;
use turkce_wordle::wordbank::{Lexicon, load_wordbank};

fn main() -> Result<()> {
    let cli = parse_cli();
    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Yapılandırma dosyası okunamadı, varsayılanlar kullanılıyor: {e:#}");
        Config::default()
    });
    config.apply_cli(&cli);

    // The full-screen UI owns the terminal, so its log goes to a file.
    let log_file = (!config.plain).then(|| config.log_path());
    init_logging(cli.verbose, log_file.as_deref());
    info_log!("Starting with config: {:?}", config);

    // A failed load leaves the menu up with start disabled until a retry works.
    let (lexicon, load_error) = match load_wordbank(config.wordlist.as_deref()) {
        Ok(lexicon) => {
            info_log!("Loaded {} words", lexicon.len());
            (lexicon, None)
        }
        Err(e) => {
            error!("Word list could not be loaded: {e}");
            (Lexicon::default(), Some(e))
        }
    };

    if !config.save_enabled {
        return run(lexicon, load_error, MemoryStorage::new(), &config);
    }

    match FileStorage::with_base_dir(config.save_dir()) {
        Ok(storage) => run(lexicon, load_error, storage, &config),
        Err(e) => {
            warn!("Save directory unavailable, games will not be kept: {e}");
            eprintln!("Oyun durumu kaydedilemedi. ({e})");
            run(lexicon, load_error, MemoryStorage::new(), &config)
        }
    }
}

fn run<S: KeyValueStorage>(
    lexicon: Lexicon,
    load_error: Option<LexiconError>,
    storage: S,
    config: &Config,
) -> Result<()> {
    let mut controller = SessionController::new(lexicon, storage, SystemClock, config.policy)
        .with_word_source(config.wordlist.clone());
    if let Some(e) = &load_error {
        controller = controller.with_setup_error(e);
    }

    let preset = config.preset();
    if config.plain {
        let mut ui = CliInterface::new(io::stdin().lock(), io::stdout());
        game_loop(&mut controller, &mut ui, preset);
    } else {
        let mut ui = TuiInterface::new().context("could not set up the terminal")?;
        game_loop(&mut controller, &mut ui, preset);
    }
    Ok(())
}
