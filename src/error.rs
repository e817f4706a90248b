use thiserror::Error;

/// Per-message fault taxonomy.
///
/// No variant tears down the connection: `Malformed` degrades to an
/// absent-result payload, `Engine` is reported inline as an error reply.
/// Transport faults are not represented here; the connection loop handles
/// them directly by ending the session.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed frame message: {0}")]
    Malformed(String),

    #[error("detection engine fault: {0}")]
    Engine(String),
}
