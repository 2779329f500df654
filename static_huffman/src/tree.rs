//! Huffman code tree.

use std::collections::VecDeque;
use dyn_size_of::GetSize;

use crate::FrequencyTable;

/// Binary Huffman tree. Each internal node owns exactly two subtrees.
///
/// The tree contains exactly one leaf for each symbol of the frequency table it was built from,
/// and the frequency of each internal node equals the sum of frequencies of its children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CodeTree<S> {
    /// Leaf that holds a symbol and its number of occurrences.
    Leaf { frequency: u64, symbol: S },
    /// Internal node. Codewords of symbols in the `left` subtree continue with `1`,
    /// and of symbols in the `right` subtree continue with `0`.
    Internal { frequency: u64, left: Box<CodeTree<S>>, right: Box<CodeTree<S>> }
}

impl<S> CodeTree<S> {
    /// Returns the frequency of the root of `self`.
    #[inline] pub fn frequency(&self) -> u64 {
        match self {
            CodeTree::Leaf { frequency, .. } | CodeTree::Internal { frequency, .. } => *frequency
        }
    }

    /// Returns whether `self` is a single leaf (the tree built for exactly one distinct symbol).
    #[inline] pub fn is_leaf(&self) -> bool { matches!(self, CodeTree::Leaf { .. }) }

    /// Returns the number of leaves.
    pub fn leaves(&self) -> usize {
        match self {
            CodeTree::Leaf { .. } => 1,
            CodeTree::Internal { left, right, .. } => left.leaves() + right.leaves()
        }
    }

    /// Returns the length of the longest path from the root to a leaf (0 for a single leaf).
    pub fn height(&self) -> u32 {
        match self {
            CodeTree::Leaf { .. } => 0,
            CodeTree::Internal { left, right, .. } => 1 + left.height().max(right.height())
        }
    }

    /// Returns the internal node whose children are `left` and `right`.
    fn merge(left: Self, right: Self) -> Self {
        CodeTree::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right)
        }
    }

    /// Removes and returns the node with the lowest frequency among the fronts of `leaves` and `internals`.
    /// A leaf is preferred on equal frequencies.
    fn pop_lowest(leaves: &mut VecDeque<Self>, internals: &mut VecDeque<Self>) -> Option<Self> {
        match (leaves.front(), internals.front()) {
            (Some(leaf), Some(internal)) if internal.frequency() < leaf.frequency() => internals.pop_front(),
            (Some(_), _) => leaves.pop_front(),
            (None, _) => internals.pop_front()
        }
    }
}

impl<S: Clone> CodeTree<S> {
    /// Constructs Huffman tree for given `frequencies`.
    ///
    /// Nodes of equal frequencies are ordered: leaves first (by ascending symbols), then
    /// internal nodes (by creation order). So the result depends only on the content of `frequencies`.
    /// The first of the two merged nodes becomes the left child.
    ///
    /// The algorithm runs in *O(n log n)* time, where *n* is the number of distinct symbols;
    /// the merging itself is linear as the internal nodes are created in non-decreasing order of frequencies.
    pub fn from_frequencies(frequencies: &FrequencyTable<S>) -> Self where S: Ord {
        let mut leaves: Vec<Self> = frequencies.iter()
            .map(|(symbol, frequency)| CodeTree::Leaf { frequency, symbol: symbol.clone() })
            .collect();
        leaves.sort_by_key(Self::frequency);    // stable, so symbols remain in ascending order
        let mut internals = VecDeque::with_capacity(leaves.len().saturating_sub(1));
        let mut leaves = VecDeque::from(leaves);
        loop {
            let first = Self::pop_lowest(&mut leaves, &mut internals);
            let second = Self::pop_lowest(&mut leaves, &mut internals);
            match (first, second) {
                (Some(left), Some(right)) => internals.push_back(Self::merge(left, right)),
                (Some(root), None) => return root,
                (None, _) => unreachable!("frequency table is never empty")
            }
        }
    }
}

impl<S: GetSize> GetSize for CodeTree<S> {
    fn size_bytes_dyn(&self) -> usize {
        match self {
            CodeTree::Leaf { symbol, .. } => symbol.size_bytes_dyn(),
            CodeTree::Internal { left, right, .. } => left.as_ref().size_bytes() + right.as_ref().size_bytes()
        }
    }
    const USES_DYN_MEM: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn leaf(frequency: u64, symbol: char) -> CodeTree<char> { CodeTree::Leaf { frequency, symbol } }

    fn internal(left: CodeTree<char>, right: CodeTree<char>) -> CodeTree<char> { CodeTree::merge(left, right) }

    fn tree_for(counts: impl IntoIterator<Item = (char, u64)>) -> CodeTree<char> {
        CodeTree::from_frequencies(&FrequencyTable::from_counts(counts).unwrap())
    }

    /// Checks that each internal node has the frequency equal to the sum of its children frequencies.
    fn check_frequencies(tree: &CodeTree<char>) -> u64 {
        match tree {
            CodeTree::Leaf { frequency, .. } => *frequency,
            CodeTree::Internal { frequency, left, right } => {
                assert_eq!(*frequency, check_frequencies(left) + check_frequencies(right));
                *frequency
            }
        }
    }

    fn collect_leaves(tree: &CodeTree<char>, result: &mut Vec<(char, u64)>) {
        match tree {
            CodeTree::Leaf { frequency, symbol } => result.push((*symbol, *frequency)),
            CodeTree::Internal { left, right, .. } => { collect_leaves(left, result); collect_leaves(right, result); }
        }
    }

    #[test]
    fn tree_aaabbc() {
        //    6
        //   / \
        //  a   3
        //     / \
        //    c   b
        let tree = tree_for([('a', 3), ('b', 2), ('c', 1)]);
        assert_eq!(tree, internal(leaf(3, 'a'), internal(leaf(1, 'c'), leaf(2, 'b'))));
        assert_eq!(tree.frequency(), 6);
        assert_eq!(tree.leaves(), 3);
        assert_eq!(tree.height(), 2);
        assert!(!tree.is_leaf());
    }

    #[test]
    fn ties_between_leaves() {
        //      4
        //    /   \
        //   2     2
        //  / \   / \
        // a   b c   d
        let tree = tree_for([('d', 1), ('c', 1), ('b', 1), ('a', 1)]);
        assert_eq!(tree, internal(internal(leaf(1, 'a'), leaf(1, 'b')), internal(leaf(1, 'c'), leaf(1, 'd'))));
    }

    #[test]
    fn ties_between_internals() {
        // internal nodes of frequency 2 are: (a,b) created first, then (c,d);
        // their parent has the same frequency as e, and e, being a leaf, is taken first
        let tree = tree_for([('a', 1), ('b', 1), ('c', 1), ('d', 1), ('e', 4)]);
        assert_eq!(tree, internal(
            leaf(4, 'e'),
            internal(internal(leaf(1, 'a'), leaf(1, 'b')), internal(leaf(1, 'c'), leaf(1, 'd')))));
    }

    #[test]
    fn single_symbol() {
        let tree = tree_for([('x', 5)]);
        assert_eq!(tree, leaf(5, 'x'));
        assert!(tree.is_leaf());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.leaves(), 1);
    }

    #[test]
    fn frequency_invariant() {
        let counts = btreemap!('d' => 12, 'e' => 11, 'f' => 10, 'a' => 3, 'b' => 2, 'c' => 1, 'g' => 7);
        let tree = tree_for(counts.clone());
        assert_eq!(check_frequencies(&tree), 46);
        let mut leaves = Vec::new();
        collect_leaves(&tree, &mut leaves);
        leaves.sort();
        assert_eq!(leaves, counts.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn independent_of_insertion_order() {
        let pairs = [('q', 5), ('w', 5), ('e', 2), ('r', 2), ('t', 9), ('y', 1), ('u', 3)];
        let expected = tree_for(pairs);
        let mut reversed = pairs;
        reversed.reverse();
        assert_eq!(tree_for(reversed), expected);
        let mut rotated = pairs;
        rotated.rotate_left(3);
        assert_eq!(tree_for(rotated), expected);
    }

    #[test]
    fn size() {
        let tree = tree_for([('a', 3), ('b', 2), ('c', 1)]);
        assert_eq!(tree.size_bytes(), 5 * std::mem::size_of::<CodeTree<char>>());
    }
}
