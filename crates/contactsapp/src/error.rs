use crate::model::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactsError {
    /// A data row could not be parsed. `row` is the zero-based index of the
    /// record below the header.
    #[error("Malformed record at row {row}: {raw:?}")]
    MalformedRecord { row: usize, raw: String },

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A mutation was applied in memory before the initial load finished, so
    /// it was not written out.
    #[error("Store is not hydrated; change kept in memory only")]
    NotHydrated,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid contact: {0}")]
    Validation(ValidationErrors),
}

impl ContactsError {
    /// True for errors caused by unreadable persisted content, as opposed to
    /// failures of the storage medium itself.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ContactsError::MalformedRecord { .. } | ContactsError::MalformedHeader(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ContactsError>;
