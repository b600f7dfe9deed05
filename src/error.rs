use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised while managing the database handle
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be reached or the URL is invalid
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] DbErr),

    /// Creating the schema failed
    #[error("Failed to migrate schema: {0}")]
    Migrate(#[source] DbErr),

    /// Closing the connection pool failed
    #[error("Failed to close database: {0}")]
    Close(#[source] DbErr),
}

/// Errors returned by the film repository
#[derive(Debug, Error)]
pub enum FilmError {
    /// No live film with the requested id (should map to HTTP 404)
    #[error("Film not found: {id}")]
    NotFound { id: i32 },

    /// Plot exceeds the column bound
    #[error("Plot too long: {len} characters, at most {max} allowed")]
    PlotTooLong { len: usize, max: usize },

    /// Error from the database or a disconnected handle
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Errors that can occur while verifying an access token
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Token is not a well-formed JWT
    #[error("Malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    /// Token header names no key the identity provider publishes
    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    /// The identity provider's key set could not be fetched
    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),

    /// Signature, expiry, issuer or audience check failed
    #[error("Token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    /// Token was issued to another client
    #[error("Client id mismatch: expected {expected}, got {actual:?}")]
    ClientIdMismatch {
        expected: String,
        actual: Option<String>,
    },
}
