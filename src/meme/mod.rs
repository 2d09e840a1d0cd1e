//! Meme selection: the remote source, the seen-meme history and the
//! selector that ties them together.

pub mod error;
pub mod history;
pub mod selector;
pub mod source;

pub use error::{MemeError, StorageError};
pub use history::HistoryStore;
pub use selector::Selector;
pub use source::{MemeApiSource, MemeRecord, MemeSource, SubredditTarget};
