use core::{fmt, matches, write};

/// A type containing error variants that may arise when using a segment tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A tree was built from an empty sequence
    Empty,
    /// A point operation targeted an index outside of the tree
    IndexOutOfRange {
        /// The rejected index as given by the caller
        index: isize,
        /// The number of elements in the tree
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => write!(f, "cannot build a segment tree from an empty sequence"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for a tree of length {len}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Returns `true` if the error represents [Error::Empty]
    pub fn is_empty(&self) -> bool {
        matches!(self, Error::Empty)
    }
    /// Returns `true` if the error represents [Error::IndexOutOfRange]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::IndexOutOfRange { .. })
    }
}
