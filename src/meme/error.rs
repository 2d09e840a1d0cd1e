use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemeError {
    #[error("Request to meme source failed: {0}")]
    Transport(String),

    #[error("Meme source returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("Meme already shown: {0}")]
    Duplicate(String),

    #[error("No fresh meme found after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
}

impl From<reqwest::Error> for MemeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MemeError::InvalidResponse(err.to_string())
        } else {
            MemeError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("History file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode history for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("History file {} could not be accessed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
