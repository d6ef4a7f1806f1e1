//! Errors reported by [`List`](crate::List) operations.

/// A failed list operation. The list it was called on is left as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Vector(#[from] imut_vector::Error),

    #[error("slice step cannot be zero")]
    ZeroStep,
}

impl Error {
    /// Whether an index or a slice bound was out of range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::Vector(imut_vector::Error::OutOfRange { .. }))
    }

    /// Whether a searched value wasn't in the list.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Vector(imut_vector::Error::NotFound))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
