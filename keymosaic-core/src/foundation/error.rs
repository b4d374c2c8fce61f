/// Convenience result type used across keymosaic.
pub type MosaicResult<T> = Result<T, MosaicError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MosaicError {
    /// A geometric precondition was violated (e.g. a cell larger than any reference image).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An index lookup fell outside `[0, len)`.
    #[error("index {index} out of range (len {len})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length at the time of the lookup.
        len: usize,
    },

    /// An operation that needs at least one frame was given none.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A frame source could not produce the requested frame.
    #[error("frame {0} not found")]
    NotFound(u64),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MosaicError {
    /// Build a [`MosaicError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`MosaicError::OutOfRange`] value.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Build a [`MosaicError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`MosaicError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
