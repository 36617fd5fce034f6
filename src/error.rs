use std::error;
use std::fmt;

/// The error type for fallible map and set operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The requested key is not present.
    KeyNotFound,
    /// The position is past-the-end where an entry was required, belongs to another map, or
    /// names an entry that has since been removed.
    InvalidIterator,
    /// The position was advanced past the end.
    IteratorOverflow,
    /// The position was moved before the first entry.
    IteratorUnderflow,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Error::KeyNotFound => "key not found",
            Error::InvalidIterator => "invalid position",
            Error::IteratorOverflow => "position advanced past the end",
            Error::IteratorUnderflow => "position moved before the first entry",
        })
    }
}

/// A specialized `Result` type for map and set operations.
pub type Result<T> = std::result::Result<T, Error>;
