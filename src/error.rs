use thiserror::Error;

/// Failure taxonomy for adapter operations.
///
/// Every method that performs I/O attaches a user-visible outcome event to
/// its failure, then rethrows so composing operations observe it and halt.
/// There are no automatic retries anywhere.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// Malformed or missing required context, detected before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The remote call itself could not complete.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The remote call completed but the response envelope carries a
    /// business error.
    #[error("Remote error: {0}")]
    Remote(String),
    /// A read returned no matching row for the bound account.
    #[error("Not found: {0}")]
    NotFound(String),
}
