use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("Attempted to invert zero in the field")]
    DivisionByZero,
    #[error("The authority holds no master secret, run setup first")]
    NotInitialized,
    #[error("The authority already holds a master secret, reset it to start a new epoch")]
    ReKeyNotAllowed,
    #[error("Decryption failed, the key does not match the ciphertext")]
    KeyMismatch,
    #[error("No curve point found for the identity within the attempt budget")]
    HashToPointExhausted,
    #[error("The supplied ciphertext was malformed")]
    MalformedCiphertext,
}

pub type Result<V, E = Error> = std::result::Result<V, E>;
