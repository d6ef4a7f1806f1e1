//! This crate provides the persistent sequence engine behind `imut`.
//!
//! [`Trie`] is a fixed-fanout blocked tree over the index space: values live
//! in leaf blocks of at most `N` elements and interior nodes hold at most `N`
//! children. Every operation that looks like a mutation returns a new [`Trie`]
//! sharing every untouched subtree with the old one, so clones are cheap and
//! old versions stay valid forever.
//!
//! Appending and prefix slicing cost `O(log n)` node copies. Insertion and
//! removal at arbitrary positions re-append the whole suffix and are `O(n)`.

pub mod error;
pub mod iter;
pub mod trie;

/// [`Trie`] takes a "branching factor" parameter, which must be a
/// reasonably-sized power of two. We use this trait to enforce that.
pub trait ValidBranchingConstant {}
pub struct Const<const N: usize> {}

impl ValidBranchingConstant for Const<2> {}
impl ValidBranchingConstant for Const<4> {}
impl ValidBranchingConstant for Const<8> {}
impl ValidBranchingConstant for Const<16> {}
impl ValidBranchingConstant for Const<32> {}
impl ValidBranchingConstant for Const<64> {}
impl ValidBranchingConstant for Const<128> {}

pub use error::{Error, Result};
pub use iter::{IntoIter, Iter};
pub use trie::Trie;
