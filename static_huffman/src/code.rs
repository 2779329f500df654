//! Tools to deal with codes.

use std::collections::BTreeMap;
use std::borrow::Borrow;
use std::fmt;

use crate::{BitPacker, CodeTree, Error, FrequencyTable, Result};

/// `Code` represents a codeword, i.e. a sequence of `len` bits.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Hash)]
pub struct Code {
    /// Concatenated bits of the codeword. The lowest bit contains the last bit.
    /// Codewords of trees built from `u64` frequencies never exceed 92 bits.
    pub bits: u128,
    /// Number of bits.
    pub len: u32
}

impl Code {
    /// Codeword assigned to the only symbol of the tree that consists of a single leaf.
    pub const SINGLE_SYMBOL: Code = Code { bits: 0, len: 1 };

    /// Returns `self` extended by `bit`.
    #[inline] pub fn push(self, bit: bool) -> Self {
        Self { bits: (self.bits << 1) | bit as u128, len: self.len + 1 }
    }

    /// Gets `index`-th bit, counting from the beginning of the codeword.
    #[inline] pub fn get(&self, index: u32) -> bool {
        (self.bits >> (self.len - index - 1)) & 1 != 0
    }

    /// Returns an iterator over the bits of `self`, from the first one.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }

    /// Returns whether `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    /// Writes the bits of `self` as a string of `0`s and `1`s.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|bit| f.write_str(if bit { "1" } else { "0" }))
    }
}

/// Mapping from symbols to their (prefix-free) codewords.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Code>
}

impl<S: Ord + Clone> CodeTable<S> {
    /// Constructs the code table for the given `tree`, by depth-first traversal.
    ///
    /// Descending to the left child appends `1`, to the right one `0`.
    /// If the whole `tree` is a single leaf, its symbol obtains [`Code::SINGLE_SYMBOL`].
    pub fn from_tree(tree: &CodeTree<S>) -> Self {
        let mut codes = BTreeMap::new();
        match tree {
            CodeTree::Leaf { symbol, .. } => { codes.insert(symbol.clone(), Code::SINGLE_SYMBOL); }
            CodeTree::Internal { .. } => Self::collect(tree, Code::default(), &mut codes)
        }
        Self { codes }
    }

    fn collect(node: &CodeTree<S>, code: Code, codes: &mut BTreeMap<S, Code>) {
        match node {
            CodeTree::Leaf { symbol, .. } => { codes.insert(symbol.clone(), code); }
            CodeTree::Internal { left, right, .. } => {
                Self::collect(left, code.push(true), codes);
                Self::collect(right, code.push(false), codes);
            }
        }
    }
}

impl<S: Ord> CodeTable<S> {
    /// Returns the codeword of `symbol` or `None` if `symbol` has no codeword.
    #[inline] pub fn get(&self, symbol: &S) -> Option<Code> { self.codes.get(symbol).copied() }

    /// Returns the number of symbols with codewords.
    #[inline] pub fn len(&self) -> usize { self.codes.len() }

    /// Always returns `false` for the tables built from trees.
    #[inline] pub fn is_empty(&self) -> bool { self.codes.is_empty() }

    /// Returns an iterator over `(symbol, codeword)` pairs, in ascending order of symbols.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&S, Code)> + '_ {
        self.codes.iter().map(|(symbol, code)| (symbol, *code))
    }

    /// Returns the length of the longest codeword.
    pub fn max_len(&self) -> u32 {
        self.codes.values().map(|code| code.len).max().unwrap_or(0)
    }
}

impl<S: Ord + fmt::Debug> CodeTable<S> {
    /// Returns the total number of bits needed to encode the sequence counted by `frequencies`.
    ///
    /// Returns [`Error::CodeTableMismatch`] if some symbol of `frequencies` has no codeword.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable<S>) -> Result<u64> {
        frequencies.iter().try_fold(0u64, |bits, (symbol, count)| {
            Ok(bits + self.code_of(symbol)?.len as u64 * count)
        })
    }

    /// Appends the codewords of all `symbols` (in their order) to `packer`.
    ///
    /// Returns [`Error::CodeTableMismatch`] if some symbol has no codeword.
    pub fn pack<Iter>(&self, symbols: Iter, packer: &mut BitPacker) -> Result<()>
        where Iter: IntoIterator, Iter::Item: Borrow<S>
    {
        for symbol in symbols {
            packer.push_code(self.code_of(symbol.borrow())?);
        }
        Ok(())
    }

    /// Encodes `symbols` (in their order) and returns the packed bits.
    ///
    /// Returns [`Error::CodeTableMismatch`] if some symbol has no codeword.
    pub fn encode<Iter>(&self, symbols: Iter) -> Result<BitPacker>
        where Iter: IntoIterator, Iter::Item: Borrow<S>
    {
        let mut packer = BitPacker::new();
        self.pack(symbols, &mut packer)?;
        Ok(packer)
    }

    fn code_of(&self, symbol: &S) -> Result<Code> {
        self.get(symbol).ok_or_else(||
            Error::CodeTableMismatch(format!("symbol {:?} has no codeword", symbol)))
    }
}
