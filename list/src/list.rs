use std::{
    cmp::Ordering,
    fmt,
    num::NonZeroIsize,
    ops::{Add, Index},
};

use imut_vector::{Const, IntoIter, Iter, Trie, ValidBranchingConstant};

use crate::{Error, Result};

/// An immutable list.
///
/// This is implemented internally as a tree, and the parameter `N` controls its
/// branching factor. It must be a power of 2; the default of `64` keeps trees
/// very shallow.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct List<T, const N: usize = 64>
where
    Const<N>: ValidBranchingConstant,
{
    trie: Trie<T, N>,
}

/// Resolves an optional slice bound the way Python's `slice.indices` does:
/// negative bounds count from the end, and anything still outside the list is
/// clamped to just before its start or just after its end depending on the
/// direction of the slice.
fn adjust_bound(bound: Option<isize>, default: isize, len: isize, backwards: bool) -> isize {
    let Some(bound) = bound else {
        return default;
    };
    if bound < 0 {
        let bound = bound.saturating_add(len);
        if bound >= 0 {
            bound
        } else if backwards {
            -1
        } else {
            0
        }
    } else if bound >= len {
        if backwards {
            len - 1
        } else {
            len
        }
    } else {
        bound
    }
}

impl<T, const N: usize> List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Creates an empty list.
    pub fn new() -> Self {
        List { trie: Trie::new() }
    }

    /// The number of elements in this list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([0, 1, 2, 3, 4, 5]);
    /// assert_eq!(list.len(), 6);
    /// ```
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Returns `true` if the length is zero.
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Gets the element at `index`. Negative indices count from the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([0, 1, 2, 3, 4, 5]);
    /// assert_eq!(list.get(2), Ok(&2));
    /// assert_eq!(list.get(-1), Ok(&5));
    /// assert!(list.get(6).is_err());
    /// ```
    pub fn get(&self, index: isize) -> Result<&T> {
        Ok(self.trie.get(index)?)
    }

    /// Returns an iterator over references to list elements.
    pub fn iter(&self) -> Iter<'_, T, N> {
        self.trie.iter()
    }

    /// The trie backing this list.
    pub fn as_trie(&self) -> &Trie<T, N> {
        &self.trie
    }

    /// Returns the position of the first element equal to `value` among the
    /// positions `start..stop`.
    ///
    /// Missing bounds default to the whole list; negative bounds count from
    /// the end, and bounds past either end are clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([1, 2, 3, 2]);
    /// assert_eq!(list.index(&2, None, None), Ok(1));
    /// assert_eq!(list.index(&2, Some(2), None), Ok(3));
    /// assert!(list.index(&1, Some(1), Some(3)).is_err());
    /// ```
    pub fn index(&self, value: &T, start: Option<isize>, stop: Option<isize>) -> Result<usize>
    where
        T: PartialEq,
    {
        let len = isize::try_from(self.len()).unwrap_or(isize::MAX);
        self.trie
            .find(value, start.unwrap_or(0), stop.unwrap_or(len))
            .ok_or(Error::Vector(imut_vector::Error::NotFound))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index(value, None, None).is_ok()
    }

    /// The number of elements equal to `value`.
    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.iter().filter(|&elt| elt == value).count()
    }
}

impl<T: Clone, const N: usize> List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Returns this list with `value` added at the end.
    ///
    /// Runs in time complexity `O(log n)` where `n` is the list length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([1, 2, 3]);
    /// let longer = list.append(4);
    /// assert_eq!(longer.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(list.len(), 3);
    /// ```
    pub fn append(&self, value: T) -> Self {
        List {
            trie: self.trie.push_back(value),
        }
    }

    /// Returns this list with all the values of `iter` added at the end.
    pub fn extend<I: IntoIterator<Item = T>>(&self, iter: I) -> Self {
        let mut trie = self.trie.clone();
        trie.extend(iter);
        List { trie }
    }

    /// Returns this list with `value` inserted before position `index`.
    ///
    /// Negative indices count from the end, and inserting at the length is
    /// the same as appending. Runs in time complexity `O(n - index)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([1, 2, 4]);
    /// let list = list.insert(2, 3).unwrap();
    /// assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// ```
    pub fn insert(&self, index: isize, value: T) -> Result<Self> {
        Ok(List {
            trie: self.trie.insert_at(index, value)?,
        })
    }

    /// Returns this list without the first element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter([1, 3, 2, 3]);
    /// let removed = list.remove(&3).unwrap();
    /// assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert!(list.remove(&4).unwrap_err().is_not_found());
    /// ```
    pub fn remove(&self, value: &T) -> Result<Self>
    where
        T: PartialEq,
    {
        Ok(List {
            trie: self.trie.remove_first(value)?,
        })
    }

    /// Returns the sublist `list[start:stop:step]`, with the same meaning as a
    /// Python slice: missing bounds cover everything in the direction of
    /// `step`, negative bounds count from the end and out-of-range bounds are
    /// clamped. A missing step is `1`.
    ///
    /// Slices starting at the beginning with a step of `1` share their memory
    /// with this list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut::List;
    /// let list = List::<_>::from_iter(0..10);
    /// let collect = |l: List<_>| l.into_iter().collect::<Vec<_>>();
    /// assert_eq!(collect(list.slice(None, Some(3), None).unwrap()), vec![0, 1, 2]);
    /// assert_eq!(collect(list.slice(Some(-3), None, None).unwrap()), vec![7, 8, 9]);
    /// assert_eq!(collect(list.slice(Some(1), None, Some(4)).unwrap()), vec![1, 5, 9]);
    /// assert_eq!(collect(list.slice(None, None, Some(-3)).unwrap()), vec![9, 6, 3, 0]);
    /// ```
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Result<Self> {
        let step = NonZeroIsize::new(step.unwrap_or(1)).ok_or(Error::ZeroStep)?;
        let len = isize::try_from(self.len()).unwrap_or(isize::MAX);

        if step.get() > 0 {
            let start = adjust_bound(start, 0, len, false);
            let stop = adjust_bound(stop, len, len, false);
            return Ok(List {
                trie: self.trie.slice_range(start, stop, step)?,
            });
        }

        let start = adjust_bound(start, len - 1, len, true);
        let stop = adjust_bound(stop, -1, len, true);
        if start <= stop {
            return Ok(List::new());
        }
        if stop >= 0 {
            return Ok(List {
                trie: self.trie.slice_range(start, stop, step)?,
            });
        }

        // Counting down all the way through the first element. The trie
        // reads `-1` as the last position, so stop above zero and add the
        // first element by hand if the stride lands on it.
        let mut trie = self.trie.slice_range(start, 0, step)?;
        if start % step.get() == 0 {
            trie.push(self.trie[0].clone());
        }
        Ok(List { trie })
    }
}

impl<T, const N: usize> Default for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> From<Trie<T, N>> for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(trie: Trie<T, N>) -> Self {
        List { trie }
    }
}

impl<T: Clone, const N: usize> From<Vec<T>> for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T: Clone, const N: usize, const K: usize> From<[T; K]> for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(array: [T; K]) -> Self {
        array.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> FromIterator<T> for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        List {
            trie: Trie::build(iter),
        }
    }
}

impl<T: Clone, const N: usize> IntoIterator for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.trie.into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.trie.iter()
    }
}

impl<T, const N: usize> Index<usize> for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.trie[index]
    }
}

impl<T: Clone, const N: usize> Add for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let mut trie = self.trie;
        trie.extend(rhs);
        List { trie }
    }
}

impl<T: Clone, const N: usize> Add<&List<T, N>> for &List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = List<T, N>;

    fn add(self, rhs: &List<T, N>) -> Self::Output {
        self.extend(rhs.iter().cloned())
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, const N: usize> Ord for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, elt) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{elt}")?;
        }
        write!(f, ">")
    }
}

impl<T: serde::Serialize, const N: usize> serde::Serialize for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elt in self.iter() {
            seq.serialize_element(elt)?;
        }
        seq.end()
    }
}

impl<'de, T: Clone + serde::Deserialize<'de>, const N: usize> serde::Deserialize<'de>
    for List<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let vec: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(vec.into_iter().collect())
    }
}
