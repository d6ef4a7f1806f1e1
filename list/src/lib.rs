//! Immutable lists.
//!
//! A [`List`] never changes once built. Methods such as [`List::append`] or
//! [`List::remove`] return a new list, and the old one stays valid and shares
//! most of its memory with the new one. Lists are backed by the blocked trie
//! from [`imut_vector`], with a branching factor of 64 unless specified
//! otherwise.

pub mod error;
pub mod list;

pub use error::{Error, Result};
pub use list::List;
