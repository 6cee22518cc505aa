//! Error types for FurMeds

use thiserror::Error;

/// Input rejected before it reaches local state or the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Pet has no display name
    #[error("Not all required fields are filled: please fill in a name")]
    MissingName,

    /// Pet has no species selected
    #[error("Not all required fields are filled: please fill in a species")]
    MissingSpecies,

    /// Pet has no uploaded image
    #[error("Not all required fields are filled: please upload an image")]
    MissingImage,

    /// A required text field is empty
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Time of day not in HH:MM form
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    /// Numeric field could not be parsed
    #[error("Invalid number for '{field}': {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Unknown enumerated value (species, unit, language, theme)
    #[error("Invalid value for '{field}': {value}")]
    InvalidChoice { field: &'static str, value: String },

    /// E-mail address is malformed
    #[error("Invalid e-mail address '{0}'")]
    InvalidEmail(String),
}

/// Main error type for FurMeds operations
#[derive(Error, Debug)]
pub enum FurMedsError {
    /// Backend request failed (transport or server side)
    #[error("Something bad happened; please try again later ({0})")]
    Api(String),

    /// Authentication provider rejected the request
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Operation requires a signed-in user
    #[error("Not signed in")]
    NotSignedIn,

    /// Form input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Device permission (camera, gallery) was denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Pet was not found in the loaded list
    #[error("Pet not found: {0}")]
    PetNotFound(String),

    /// Sub-record was not found in its parent collection
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: String },

    /// Identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Error during object storage upload
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Error during storage operations (redb)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database creation/opening error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage operation error
    #[error("Storage operation error: {0}")]
    StorageOp(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration (base URLs, keys)
    #[error("Configuration error: {0}")]
    Config(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using FurMedsError
pub type FurMedsResult<T> = Result<T, FurMedsError>;
