//! Error types for bit arrays and the prefix codec.

use thiserror::Error;

/// Errors returned by [`BitArray`](crate::BitArray) operations and the codec.
#[derive(Debug, Error)]
pub enum Error {
    /// An integer magnitude below zero was given to a constructor.
    #[error("bit array magnitude must be non-negative, got {0}")]
    NegativeMagnitude(i128),

    /// A binary string contained something other than `'0'` or `'1'`.
    #[error("binary string must contain only '0' and '1', found {ch:?} at position {position}")]
    InvalidBinaryChar { ch: char, position: usize },

    /// A single-bit access fell outside `[-len, len)`.
    #[error("index {index} out of bounds for bit array of length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    #[error("slice step cannot be zero")]
    ZeroStep,

    /// Slice assignment is only defined for a step of 1.
    #[error("slice assignment with step {0} is not supported, only step 1")]
    UnsupportedStep(isize),

    #[error("invalid code table: {0}")]
    Table(#[from] TableError),

    /// Decoding reached bits that no code in the table matches.
    #[error("cannot resolve code '{0}'")]
    Unresolvable(String),

    #[error("decrypted bytes are not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed container: {0}")]
    Container(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a code table is rejected before encoding or decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("empty code for symbol {0:?}")]
    EmptyCode(char),

    #[error("non-binary code '{code}' for symbol {symbol:?}")]
    NonBinaryCode { symbol: char, code: String },

    #[error("no code for symbol {0:?}")]
    MissingSymbol(char),

    /// Two codes where the first is a prefix of the second.
    #[error("code '{code}' for symbol {symbol:?} starts with code '{prefix}' for symbol {prefix_symbol:?}")]
    NotPrefixFree {
        symbol: char,
        code: String,
        prefix_symbol: char,
        prefix: String,
    },
}

/// A specialized Result type for bit array and codec operations.
pub type Result<T> = std::result::Result<T, Error>;
