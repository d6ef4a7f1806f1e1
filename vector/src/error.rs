//! Errors reported by [`Trie`](crate::Trie) operations.

/// A failed operation on a trie. The receiver is never modified.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An index or bound fell outside the valid domain once negative indices
    /// were resolved against the length.
    #[error("index {index} is out of range for immutable list of length {len}")]
    OutOfRange { index: isize, len: usize },

    /// A search or a removal found no matching element.
    #[error("value not in list")]
    NotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Resolves a possibly-negative index against `len`: negative indices count
/// from the end. Returns `None` if the resolved position would be negative.
///
/// The result is not checked against `len`; callers decide whether `len`
/// itself is a valid position.
pub(crate) fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs())
    }
}
