//! Errors reported by encoding and decoding.

use thiserror::Error;

/// Error type of the library.
#[derive(Error, Debug)]
pub enum Error {
    /// There is nothing to encode, a code tree cannot be built from zero leaves.
    #[error("cannot encode an empty sequence")]
    EmptyInput,

    /// The key does not describe a valid frequency table.
    #[error("corrupt key: {0}")]
    CorruptKey(String),

    /// The payload ended before all symbols recorded in the key were decoded.
    #[error("payload truncated: decoded {decoded} of {expected} symbols")]
    TruncatedPayload {
        /// Number of symbols recorded in the key.
        expected: u64,
        /// Number of symbols decoded before the payload ended.
        decoded: u64
    },

    /// A symbol to encode has no codeword in the code table.
    #[error("code table mismatch: {0}")]
    CodeTableMismatch(String),

    /// The decoder walked off the code tree.
    #[error("code tree traversal failed after {decoded} decoded symbols")]
    TreeTraversal {
        /// Number of symbols decoded before the failure.
        decoded: u64
    },

    /// I/O error of the underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type of the library.
pub type Result<T> = std::result::Result<T, Error>;
