use std::{num::NonZeroIsize, ops::Index, sync::Arc};

use imbl_sized_chunks::Chunk;

use crate::{error::resolve_index, iter::Iter, Const, Error, Result, ValidBranchingConstant};

type Children<T, const N: usize> = Chunk<Arc<Node<T, N>>, N>;

// Shapes are canonical: a tree holding `len` values always has height
// `height_for_length(len)`, and only nodes on the right spine may be partially
// filled. Two trees therefore hold the same values exactly when they are
// structurally equal, which is what the derived comparisons check.
//
// Children are shared between versions through `Arc`. A node reachable from
// more than one root is never written to: every in-place update goes through
// `Arc::make_mut`, which copies shared nodes first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Node<T, const N: usize> {
    Leaf {
        data: Chunk<T, N>,
    },
    Branch {
        children: Children<T, N>,
        height: u8,
        size: usize,
    },
}

/// `idx` is the global index into the root node, and we are a branch at
/// height `height` (where leaves are at height zero). Which of our children
/// does the global index belong to?
fn extract_index<const N: usize>(idx: usize, height: u8) -> usize {
    let shifted: usize = idx >> (N.ilog2() * u32::from(height));
    shifted & (N - 1)
}

/// The number of values in a full subtree of height `height`.
fn capacity<const N: usize>(height: u8) -> usize {
    N.saturating_pow(u32::from(height) + 1)
}

fn height_for_length<const N: usize>(length: usize) -> u8 {
    // Length zero through N has height zero, length N + 1 through N^2 has height 1, etc.
    let height = length.saturating_sub(1).max(1).ilog(N);
    u8::try_from(height).unwrap_or(u8::MAX)
}

/// The positions visited by `range(from, to, step)`: counting up from `from`
/// while below `to`, or down from `from` while above `to` if `step` is negative.
fn stepped(from: usize, to: usize, step: isize) -> impl Iterator<Item = usize> {
    let stride = step.unsigned_abs();
    let count = if step > 0 {
        to.saturating_sub(from).div_ceil(stride)
    } else {
        from.saturating_sub(to).div_ceil(stride)
    };
    (0..count).map(move |k| {
        if step > 0 {
            from + k * stride
        } else {
            from - k * stride
        }
    })
}

impl<T, const N: usize> Node<T, N> {
    fn empty() -> Self {
        Node::Leaf { data: Chunk::new() }
    }

    /// Makes a branch out of subtrees that are one level shorter than `height`.
    fn branch(children: Children<T, N>, height: u8) -> Self {
        let size = children.iter().map(|child| child.len()).sum();
        Node::Branch {
            children,
            height,
            size,
        }
    }

    /// A subtree of height `height` holding only `elt`.
    fn spine(elt: T, height: u8) -> Self {
        let mut node = Node::Leaf {
            data: Chunk::unit(elt),
        };
        for h in 1..=height {
            node = Node::Branch {
                children: Chunk::unit(Arc::new(node)),
                height: h,
                size: 1,
            };
        }
        node
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf { data } => data.len(),
            Node::Branch { size, .. } => *size,
        }
    }

    fn height(&self) -> u8 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Branch { height, .. } => *height,
        }
    }

    fn get(&self, idx: usize) -> Option<&T> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { data } => return data.get(idx & (N - 1)),
                Node::Branch {
                    children, height, ..
                } => {
                    node = children.get(extract_index::<N>(idx, *height))?.as_ref();
                }
            }
        }
    }

    /// The leaf block holding the global index `idx`, which must be in bounds.
    pub(crate) fn leaf_at(&self, idx: usize) -> &[T] {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { data } => return data,
                Node::Branch {
                    children, height, ..
                } => {
                    node = children[extract_index::<N>(idx, *height)].as_ref();
                }
            }
        }
    }

    /// Finds the first global index in `[start, stop)` holding `value`. This
    /// subtree starts at global index `offset`, and must overlap the window.
    fn find(&self, value: &T, start: usize, stop: usize, offset: usize) -> Option<usize>
    where
        T: PartialEq,
    {
        match self {
            Node::Leaf { data } => {
                let data: &[T] = data;
                let lo = start.saturating_sub(offset);
                let hi = (stop - offset).min(data.len());
                data.get(lo..hi)?
                    .iter()
                    .position(|elt| elt == value)
                    .map(|pos| offset + lo + pos)
            }
            Node::Branch {
                children, height, ..
            } => {
                let span = capacity::<N>(*height - 1);
                let first = start.saturating_sub(offset) / span;
                let last = (stop - 1 - offset) / span;
                children
                    .iter()
                    .enumerate()
                    .take(last + 1)
                    .skip(first)
                    .find_map(|(i, child)| child.find(value, start, stop, offset + i * span))
            }
        }
    }
}

impl<T: Clone, const N: usize> Node<T, N> {
    /// Appends `elt` at the end of this subtree.
    ///
    /// If the subtree is full, `elt` is handed back so that the caller can
    /// put it in a new sibling instead.
    fn push(&mut self, elt: T) -> std::result::Result<(), T> {
        match self {
            Node::Leaf { data } => {
                if data.is_full() {
                    Err(elt)
                } else {
                    data.push_back(elt);
                    Ok(())
                }
            }
            Node::Branch {
                children,
                height,
                size,
            } => {
                // Only the last child can have room. We check before recursing
                // so that a full, shared child doesn't get copied for nothing.
                let elt = match children.last_mut() {
                    Some(last) if last.len() < capacity::<N>(*height - 1) => {
                        match Arc::make_mut(last).push(elt) {
                            Ok(()) => {
                                *size += 1;
                                return Ok(());
                            }
                            Err(elt) => elt,
                        }
                    }
                    _ => elt,
                };

                if children.is_full() {
                    return Err(elt);
                }
                children.push_back(Arc::new(Node::spine(elt, *height - 1)));
                *size += 1;
                Ok(())
            }
        }
    }

    /// Shrinks the length of this subtree to `len`.
    ///
    /// Assumes that `len` is less than this node's current length, and that
    /// it is large enough to need every level of this subtree.
    fn truncate(&mut self, len: usize) {
        match self {
            Node::Leaf { data } => {
                data.drop_right(len);
            }
            Node::Branch {
                children,
                height,
                size,
            } => {
                // The children left of `len` are all full and are kept as they
                // are; only the child containing `len` needs to be cut.
                let child_capacity = capacity::<N>(*height - 1);
                let num_full_children = len / child_capacity;
                let extra = len % child_capacity;
                if extra > 0 {
                    children.drop_right(num_full_children + 1);
                    Arc::make_mut(&mut children[num_full_children]).truncate(extra);
                } else {
                    children.drop_right(num_full_children);
                }
                *size = len;
            }
        }
    }
}

/// A persistent sequence stored as a blocked trie with branching factor `N`.
///
/// Cloning is `O(1)`. Every method taking `&self` and returning a `Trie`
/// leaves `self` untouched and shares as much of it as possible with the
/// result.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Trie<T, const N: usize = 64>
where
    Const<N>: ValidBranchingConstant,
{
    root: Arc<Node<T, N>>,
}

impl<T, const N: usize> Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    pub fn new() -> Self {
        Trie {
            root: Arc::new(Node::empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The distance between the root and the leaves: zero while everything
    /// fits in a single leaf block.
    pub fn height(&self) -> u8 {
        self.root.height()
    }

    /// Gets the element at position `idx`, or `None` if it is out of bounds.
    pub fn lookup(&self, idx: usize) -> Option<&T> {
        if idx < self.len() {
            self.root.get(idx)
        } else {
            None
        }
    }

    /// Gets the element at `index`, where negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<&T> {
        let len = self.len();
        resolve_index(index, len)
            .and_then(|idx| self.lookup(idx))
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Returns the first position in `[start, stop)` holding an element equal
    /// to `value`.
    ///
    /// Negative bounds count from the end, and bounds falling outside the
    /// sequence are clamped to it. Only the subtrees overlapping the window are
    /// searched.
    pub fn find(&self, value: &T, start: isize, stop: isize) -> Option<usize>
    where
        T: PartialEq,
    {
        let len = self.len();
        let clamp = |bound: isize| resolve_index(bound, len).map_or(0, |idx| idx.min(len));
        self.find_within(value, clamp(start), clamp(stop))
    }

    fn find_within(&self, value: &T, start: usize, stop: usize) -> Option<usize>
    where
        T: PartialEq,
    {
        if start >= stop {
            None
        } else {
            self.root.find(value, start, stop, 0)
        }
    }

    pub fn iter(&self) -> Iter<'_, T, N> {
        self.into_iter()
    }

    /// Iterates over the elements from position `idx` onwards.
    ///
    /// Panics if `idx` is larger than the length.
    pub fn iter_starting_at(&self, idx: usize) -> Iter<'_, T, N> {
        if idx > self.len() {
            panic!("out of bounds");
        }
        Iter::new(self, idx, self.len())
    }

    pub(crate) fn leaf_at(&self, idx: usize) -> &[T] {
        self.root.leaf_at(idx)
    }

    /// Panics if the shape of the tree isn't the one that appending produces.
    pub fn check_invariants(&self) {
        fn check_rec<T, const N: usize>(node: &Node<T, N>, right_most: bool) -> usize {
            match node {
                Node::Leaf { data } => {
                    assert!(right_most || data.is_full(), "partial leaf off the spine");
                    data.len()
                }
                Node::Branch {
                    children,
                    height,
                    size,
                } => {
                    let (tail, others) = children.split_last().expect("empty branch node");
                    let mut total = 0;
                    for child in others {
                        assert_eq!(child.height() + 1, *height);
                        total += check_rec(child.as_ref(), false);
                    }
                    assert_eq!(tail.height() + 1, *height);
                    assert!(tail.len() > 0, "empty subtree");
                    total += check_rec(tail.as_ref(), right_most);
                    assert_eq!(total, *size);
                    total
                }
            }
        }

        let len = check_rec(self.root.as_ref(), true);
        assert_eq!(len, self.len());
        if let Node::Branch { children, .. } = self.root.as_ref() {
            assert!(children.len() > 1);
        }
        assert_eq!(self.height(), height_for_length::<N>(len));
    }
}

impl<T: Clone, const N: usize> Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Builds the shortest tree holding `values`, in order.
    ///
    /// Values are packed into leaf blocks, and blocks are wrapped `N` at a
    /// time until a single root remains.
    pub fn build<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut values = values.into_iter().peekable();
        let mut level = Vec::new();
        while values.peek().is_some() {
            let data: Chunk<T, N> = (&mut values).take(N).collect();
            level.push(Arc::new(Node::Leaf { data }));
        }

        let mut height = 0;
        while level.len() > 1 {
            height += 1;
            level = Self::wrap_level(level, height);
        }

        Trie {
            root: level.pop().unwrap_or_else(|| Arc::new(Node::empty())),
        }
    }

    /// Groups consecutive subtrees into branches of height `height`.
    fn wrap_level(nodes: Vec<Arc<Node<T, N>>>, height: u8) -> Vec<Arc<Node<T, N>>> {
        let mut nodes = nodes.into_iter().peekable();
        let mut ret = Vec::new();
        while nodes.peek().is_some() {
            let children: Children<T, N> = (&mut nodes).take(N).collect();
            ret.push(Arc::new(Node::branch(children, height)));
        }
        ret
    }

    /// Appends `elt` in place, copying only the shared nodes on the right spine.
    pub fn push(&mut self, elt: T) {
        let height = self.height();
        let elt = if self.len() < capacity::<N>(height) {
            match Arc::make_mut(&mut self.root).push(elt) {
                Ok(()) => return,
                Err(elt) => elt,
            }
        } else {
            elt
        };

        // The whole tree is full: it becomes the left child of a taller root.
        log::trace!("trie grows to height {} at length {}", height + 1, self.len());
        let mut children = Chunk::new();
        children.push_back(Arc::clone(&self.root));
        children.push_back(Arc::new(Node::spine(elt, height)));
        self.root = Arc::new(Node::branch(children, height + 1));
    }

    /// Returns a new trie with `elt` appended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use imut_vector::Trie;
    /// let trie = Trie::<_, 64>::build([1, 2, 3]);
    /// let longer = trie.push_back(4);
    /// assert_eq!(longer.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(trie.len(), 3);
    /// ```
    pub fn push_back(&self, elt: T) -> Self {
        let mut ret = self.clone();
        ret.push(elt);
        ret
    }

    /// Shrinks the length of this trie to `len`, keeping the first elements.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }

        let new_height = height_for_length::<N>(len);
        if new_height < self.height() {
            log::trace!("trie shrinks from height {} to {new_height}", self.height());
        }
        while self.height() > new_height {
            let first = match self.root.as_ref() {
                Node::Branch { children, .. } => {
                    Arc::clone(children.first().expect("empty branch node"))
                }
                Node::Leaf { .. } => unreachable!("leaf above height zero"),
            };
            self.root = first;
        }

        if len < self.len() {
            Arc::make_mut(&mut self.root).truncate(len);
        }
    }

    /// Returns the elements at positions `range(start, stop, step)`.
    ///
    /// Negative `start` and `stop` count from the end; once resolved they must
    /// lie in `[0, len]`. Prefixes (`start == 0` and `step == 1`) share every
    /// untouched subtree with `self`; anything else is copied into a new tree.
    pub fn slice_range(&self, start: isize, stop: isize, step: NonZeroIsize) -> Result<Self> {
        let len = self.len();
        let resolve = |index: isize| {
            resolve_index(index, len)
                .filter(|&idx| idx <= len)
                .ok_or(Error::OutOfRange { index, len })
        };
        let from = resolve(start)?;
        let to = resolve(stop)?;
        let step = step.get();

        if from == 0 && step == 1 && to > 1 {
            let mut ret = self.clone();
            ret.truncate(to);
            return Ok(ret);
        }

        // Counting down starts at `from` itself, which must then be an element.
        if step < 0 && from > to && from == len {
            return Err(Error::OutOfRange { index: start, len });
        }
        Ok(Self::build(stepped(from, to, step).map(|idx| self[idx].clone())))
    }

    /// Returns a new trie with `elt` inserted before position `index`.
    ///
    /// Negative indices count from the end, and inserting at the length
    /// appends. Every element after the insertion point gets re-appended, so
    /// this costs `O(len - index)` appends.
    pub fn insert_at(&self, index: isize, elt: T) -> Result<Self> {
        let len = self.len();
        let at = resolve_index(index, len)
            .filter(|&idx| idx <= len)
            .ok_or(Error::OutOfRange { index, len })?;

        let mut ret = self.clone();
        ret.truncate(at);
        ret.push(elt);
        if at < len {
            log::debug!("insertion at {at} re-appends {} elements", len - at);
            ret.extend(self.iter_starting_at(at).cloned());
        }
        Ok(ret)
    }

    /// Returns a new trie without the first element equal to `value`.
    pub fn remove_first(&self, value: &T) -> Result<Self>
    where
        T: PartialEq,
    {
        let len = self.len();
        let at = self.find_within(value, 0, len).ok_or(Error::NotFound)?;

        let mut ret = self.clone();
        ret.truncate(at);
        if at + 1 < len {
            log::debug!("removal at {at} re-appends {} elements", len - at - 1);
            ret.extend(self.iter_starting_at(at + 1).cloned());
        }
        Ok(ret)
    }
}

impl<T, const N: usize> Default for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug, const N: usize> std::fmt::Debug for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone, const N: usize> Extend<T> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elt in iter {
            self.push(elt);
        }
    }
}

impl<T: Clone, const N: usize> FromIterator<T> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build(iter)
    }
}

impl<T, const N: usize> Index<usize> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.lookup(index).expect("index out of range")
    }
}
