//! Error types, one enum per failure class.
//!
//! - [`LexiconError`], [`SetupError`]: block game start until setup is retried.
//! - [`Rejection`]: invalid input; the turn is not consumed.
//! - [`StoreError`]: persistence failed; play continues in memory.
//! - [`SessionError`]: broken session invariant; the session is aborted.
//!
//! Display strings of user-facing variants are in Turkish because they are
//! shown verbatim by the frontends.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Sözlük okunamadı ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[cfg(feature = "network")]
    #[error("Sözlük indirilemedi ({url}): {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP desteği olmadan derlendi, sözlük indirilemez: {url}")]
    NetworkDisabled { url: String },

    #[error("Sözlük boş veya geçerli kelime bulunamadı.")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Uygun uzunlukta kelime bulunamadı!")]
    NoPlayableLengths,

    #[error("{0} harfli kelime bulunamadı.")]
    EmptyPartition(usize),

    #[error("Lütfen geçerli bir kelime uzunluğu seçin.")]
    UnavailableLength(usize),

    #[error("Önce bir oyun modu seçin.")]
    WrongPhase,

    #[error("Oyun başlatılamadı: Sözlük hatası.")]
    WordListUnavailable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Kelime yeterince uzun değil!")]
    Incomplete { expected: usize, got: usize },

    #[error("En az {min} harf girmelisiniz!")]
    TooShort { min: usize, got: usize },

    #[error("Kelime sözlükte yok!")]
    NotInWordList { word: String },

    #[error("Önceki tahmin hâlâ işleniyor.")]
    Busy,

    #[error("Şu anda tahmin yapılamaz.")]
    NotPlaying,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize game state: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Hedef kelime yüklenemedi. Lütfen yeni bir oyun başlatın.")]
    MissingTarget,

    #[error("Oyun kelimesi hazırlanırken bir hata oluştu.")]
    MalformedTarget(String),
}

/// Why a submitted guess did not produce a turn.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Aborted(#[from] SessionError),
}
