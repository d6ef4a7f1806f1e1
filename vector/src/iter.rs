//! Iterators over the elements of a [`Trie`].

use std::iter::FusedIterator;

use crate::{Const, Trie, ValidBranchingConstant};

/// A borrowing iterator over a range of positions of a [`Trie`].
///
/// Each end keeps the rest of its current leaf block around, so walking the
/// whole trie only descends from the root once per leaf.
#[derive(Debug, Clone)]
pub struct Iter<'a, T, const N: usize>
where
    Const<N>: ValidBranchingConstant,
{
    trie: &'a Trie<T, N>,
    // The positions still to be yielded are `front..back`.
    front: usize,
    back: usize,
    front_leaf: std::slice::Iter<'a, T>,
    back_leaf: std::slice::Iter<'a, T>,
}

impl<'a, T, const N: usize> Iter<'a, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    pub(crate) fn new(trie: &'a Trie<T, N>, front: usize, back: usize) -> Self {
        debug_assert!(front <= back && back <= trie.len());
        Iter {
            trie,
            front,
            back,
            front_leaf: [].iter(),
            back_leaf: [].iter(),
        }
    }
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let ret = match self.front_leaf.next() {
            Some(ret) => ret,
            None => {
                let leaf = self.trie.leaf_at(self.front);
                self.front_leaf = leaf[(self.front & (N - 1))..].iter();
                self.front_leaf.next()?
            }
        };
        self.front += 1;
        Some(ret)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T, const N: usize> DoubleEndedIterator for Iter<'_, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let ret = match self.back_leaf.next_back() {
            Some(ret) => ret,
            None => {
                let last = self.back - 1;
                let leaf = self.trie.leaf_at(last);
                self.back_leaf = leaf[..=(last & (N - 1))].iter();
                self.back_leaf.next_back()?
            }
        };
        self.back -= 1;
        Some(ret)
    }
}

impl<T, const N: usize> ExactSizeIterator for Iter<'_, T, N> where Const<N>: ValidBranchingConstant {}

impl<T, const N: usize> FusedIterator for Iter<'_, T, N> where Const<N>: ValidBranchingConstant {}

/// An owning iterator over a [`Trie`].
///
/// Elements are cloned out of the tree, which may still be shared with other
/// versions.
#[derive(Debug, Clone)]
pub struct IntoIter<T, const N: usize>
where
    Const<N>: ValidBranchingConstant,
{
    trie: Trie<T, N>,
    front: usize,
    back: usize,
}

impl<T: Clone, const N: usize> Iterator for IntoIter<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let ret = self.trie.lookup(self.front).cloned();
        self.front += 1;
        ret
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T: Clone, const N: usize> DoubleEndedIterator for IntoIter<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.trie.lookup(self.back).cloned()
    }
}

impl<T: Clone, const N: usize> ExactSizeIterator for IntoIter<T, N> where
    Const<N>: ValidBranchingConstant
{
}

impl<'a, T, const N: usize> IntoIterator for &'a Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self, 0, self.len())
    }
}

impl<T: Clone, const N: usize> IntoIterator for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.len();
        IntoIter {
            trie: self,
            front: 0,
            back,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Trie;

    #[test]
    fn forward_and_backward() {
        let trie: Trie<u32, 2> = (0..37).collect();
        assert_eq!(trie.iter().copied().collect::<Vec<_>>(), (0..37).collect::<Vec<_>>());
        assert_eq!(
            trie.iter().rev().copied().collect::<Vec<_>>(),
            (0..37).rev().collect::<Vec<_>>()
        );
        assert_eq!(trie.iter().len(), 37);
        assert_eq!(
            trie.clone().into_iter().rev().collect::<Vec<_>>(),
            (0..37).rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn both_ends_meet() {
        let trie: Trie<u32, 4> = (0..10).collect();
        let mut iter = trie.iter();
        let mut seen = Vec::new();
        while let Some(x) = iter.next() {
            seen.push(*x);
            if let Some(y) = iter.next_back() {
                seen.push(*y);
            }
        }
        assert_eq!(seen, vec![0, 9, 1, 8, 2, 7, 3, 6, 4, 5]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn starting_at() {
        let trie: Trie<u32, 4> = (0..50).collect();
        for idx in 0..=50 {
            let rest: Vec<u32> = trie.iter_starting_at(idx).copied().collect();
            assert_eq!(rest, (idx as u32..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn empty() {
        let trie = Trie::<u32>::new();
        assert_eq!(trie.iter().next(), None);
        assert_eq!(trie.into_iter().next_back(), None);
    }
}
