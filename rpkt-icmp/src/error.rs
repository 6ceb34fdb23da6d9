use thiserror::Error;

/// The error type returned when decoding ICMP messages and extension
/// structures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer is shorter than a structurally required length.
    #[error("malformed packet: {field} needs {needed} bytes, {available} available")]
    Malformed {
        /// The structure that failed to decode.
        field: &'static str,
        /// Bytes required by the structure.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },
}

impl Error {
    #[inline]
    pub(crate) fn malformed(field: &'static str, needed: usize, available: usize) -> Self {
        Error::Malformed {
            field,
            needed,
            available,
        }
    }
}

/// A `Result` alias whose error is [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
