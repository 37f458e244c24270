use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, QecError>;

/// Failures surfaced by codes, noise models, decoders and the estimators built on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QecError {
    /// Malformed or mismatched input: wrong vector lengths, even repetition size,
    /// probabilities outside [0, 1], out-of-range action index.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The state handed to an operation is not one it is defined for, e.g. decoding a
    /// superposition as if it were collapsed.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A stabilizer generator set that cannot back a code.
    #[error("construction error: {0}")]
    Construction(String),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl QecError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        QecError::InvalidInput(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        QecError::InvalidState(msg.into())
    }

    pub(crate) fn construction(msg: impl Into<String>) -> Self {
        QecError::Construction(msg.into())
    }
}
