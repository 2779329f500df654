//! Persisted key: the frequency table and the number of encoded symbols.
//!
//! The key is stored as (all integers are little-endian):
//! - format version tag (`u8`), which also declares the symbol encoding, see [`SymbolKind`],
//! - number of encoded symbols (`u64`),
//! - number of distinct symbols *N* (`u32`),
//! - *N* pairs: symbol (`u8` or `u32`), number of its occurrences (`u64`), in ascending order of symbols.

use std::fmt;
use std::io::{Read, Write};

use crate::io::{key_read_error, read_int, write_int};
use crate::{CodeTree, Error, FrequencyTable, Result};

/// Encoding of symbols in the key, declared by the format version tag.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum SymbolKind {
    /// Bytes, each stored as `u8`.
    Byte,
    /// Unicode scalar values, each stored as `u32`.
    Char
}

impl SymbolKind {
    /// Returns the format version tag.
    #[inline] pub fn tag(self) -> u8 {
        match self { SymbolKind::Byte => 1, SymbolKind::Char => 2 }
    }

    /// Returns the kind declared by `tag` or `None` if `tag` is unknown.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag { 1 => Some(SymbolKind::Byte), 2 => Some(SymbolKind::Char), _ => None }
    }

    /// Returns the number of bytes occupied by a single symbol.
    #[inline] pub fn symbol_bytes(self) -> usize {
        match self { SymbolKind::Byte => 1, SymbolKind::Char => 4 }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { SymbolKind::Byte => "byte", SymbolKind::Char => "char" })
    }
}

/// Types of symbols that can be coded and stored in the key.
pub trait Symbol: Ord + Clone + fmt::Debug {
    /// Encoding of symbols of this type.
    const KIND: SymbolKind;

    /// Writes `self` to `output`.
    fn write(&self, output: &mut dyn Write) -> std::io::Result<()>;

    /// Reads a symbol from `input`.
    fn read(input: &mut dyn Read) -> Result<Self>;
}

impl Symbol for u8 {
    const KIND: SymbolKind = SymbolKind::Byte;

    #[inline] fn write(&self, output: &mut dyn Write) -> std::io::Result<()> {
        write_int!(output, *self)
    }

    #[inline] fn read(input: &mut dyn Read) -> Result<Self> {
        read_int!(input, u8).map_err(|e| key_read_error(e, "symbol"))
    }
}

impl Symbol for char {
    const KIND: SymbolKind = SymbolKind::Char;

    #[inline] fn write(&self, output: &mut dyn Write) -> std::io::Result<()> {
        write_int!(output, *self as u32)
    }

    fn read(input: &mut dyn Read) -> Result<Self> {
        let value = read_int!(input, u32).map_err(|e| key_read_error(e, "symbol"))?;
        char::from_u32(value).ok_or_else(||
            Error::CorruptKey(format!("{:#x} is not a valid character", value)))
    }
}

/// Information needed to decode the payload: frequencies of symbols and the number of encoded symbols.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Key<S> {
    frequencies: FrequencyTable<S>,
    symbol_count: u64
}

impl<S: Ord> Key<S> {
    /// Constructs the key for a sequence counted by `frequencies`.
    pub fn new(frequencies: FrequencyTable<S>) -> Self {
        let symbol_count = frequencies.total();
        Self { frequencies, symbol_count }
    }

    /// Returns the number of encoded symbols.
    #[inline] pub fn symbol_count(&self) -> u64 { self.symbol_count }

    /// Returns the frequencies of symbols.
    #[inline] pub fn frequencies(&self) -> &FrequencyTable<S> { &self.frequencies }

    /// Returns the code tree, the same as the one used for encoding.
    pub fn tree(&self) -> CodeTree<S> where S: Clone {
        CodeTree::from_frequencies(&self.frequencies)
    }
}

impl<S: Symbol> Key<S> {
    /// Returns number of bytes which `write` will write.
    pub fn write_bytes(&self) -> usize {
        1 + std::mem::size_of::<u64>() + std::mem::size_of::<u32>()
            + self.frequencies.len() * (S::KIND.symbol_bytes() + std::mem::size_of::<u64>())
    }

    /// Writes `self` to the given `output`.
    pub fn write(&self, output: &mut dyn Write) -> std::io::Result<()> {
        write_int!(output, S::KIND.tag())?;
        write_int!(output, self.symbol_count)?;
        write_int!(output, self.frequencies.len() as u32)?;
        self.frequencies.iter().try_for_each(|(symbol, frequency)| {
            symbol.write(output)?;
            write_int!(output, frequency)
        })
    }

    /// Returns `self` written to a vector of bytes.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut result = Vec::with_capacity(self.write_bytes());
        self.write(&mut result)?;
        Ok(result)
    }

    /// Reads `Key` from the given `input`.
    ///
    /// Returns [`Error::CorruptKey`] if the key is truncated, has unknown or unexpected format version,
    /// contains no symbols, contains a symbol with zero frequency, its symbols are not in strictly ascending order,
    /// or the number of encoded symbols differs from the sum of frequencies.
    pub fn read(input: &mut dyn Read) -> Result<Self> {
        let tag = read_int!(input, u8).map_err(|e| key_read_error(e, "format version"))?;
        match SymbolKind::from_tag(tag) {
            Some(kind) if kind == S::KIND => {},
            Some(kind) => return Err(Error::CorruptKey(format!("key contains {} symbols, expected {}", kind, S::KIND))),
            None => return Err(Error::CorruptKey(format!("unknown format version {}", tag)))
        }
        let symbol_count = read_int!(input, u64).map_err(|e| key_read_error(e, "symbol count"))?;
        let len = read_int!(input, u32).map_err(|e| key_read_error(e, "number of symbols"))?;
        if len == 0 { return Err(Error::CorruptKey("no symbols".to_owned())); }
        let mut pairs = Vec::with_capacity(len.min(1 << 16) as usize);
        for _ in 0..len {
            let symbol = S::read(input)?;
            let frequency = read_int!(input, u64).map_err(|e| key_read_error(e, "frequency"))?;
            if pairs.last().is_some_and(|(previous, _)| *previous >= symbol) {
                return Err(Error::CorruptKey(format!("symbol {:?} is out of order", symbol)));
            }
            pairs.push((symbol, frequency));
        }
        let frequencies = FrequencyTable::from_counts(pairs)?;
        if frequencies.total() != symbol_count {
            return Err(Error::CorruptKey(format!("frequencies sum up to {}, but {} symbols are encoded",
                frequencies.total(), symbol_count)));
        }
        Ok(Self { frequencies, symbol_count })
    }

    /// Reads `Key` from `bytes`, which must contain nothing more.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        let result = Self::read(&mut bytes)?;
        if !bytes.is_empty() {
            return Err(Error::CorruptKey(format!("{} unexpected bytes after the key", bytes.len())));
        }
        Ok(result)
    }
}

/// Returns the kind of symbols of the key stored in `bytes`, declared by its format version tag.
pub fn peek_kind(bytes: &[u8]) -> Result<SymbolKind> {
    let tag = *bytes.first().ok_or_else(|| Error::CorruptKey("key is empty".to_owned()))?;
    SymbolKind::from_tag(tag).ok_or_else(|| Error::CorruptKey(format!("unknown format version {}", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_for<S: Symbol>(symbols: &[S]) -> Key<S> {
        Key::new(FrequencyTable::from_symbols(symbols).unwrap())
    }

    /// Returns the key bytes for the given fields, `u8` symbols.
    fn raw_key(tag: u8, symbol_count: u64, pairs: &[(u8, u64)]) -> Vec<u8> {
        let mut result = vec![tag];
        result.extend_from_slice(&symbol_count.to_le_bytes());
        result.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
        for (symbol, frequency) in pairs {
            result.push(*symbol);
            result.extend_from_slice(&frequency.to_le_bytes());
        }
        result
    }

    fn assert_corrupt(bytes: &[u8]) {
        assert!(matches!(Key::<u8>::from_bytes(bytes), Err(Error::CorruptKey(_))), "{:?}", bytes);
    }

    #[test]
    fn layout() {
        let key = key_for(b"aaabbc");
        let bytes = key.to_bytes().unwrap();
        assert_eq!(bytes, raw_key(1, 6, &[(b'a', 3), (b'b', 2), (b'c', 1)]));
        assert_eq!(bytes.len(), key.write_bytes());
        assert_eq!(Key::<u8>::from_bytes(&bytes).unwrap(), key);
        assert_eq!(peek_kind(&bytes).unwrap(), SymbolKind::Byte);
    }

    #[test]
    fn char_key() {
        let key = key_for(&"zażółć".chars().collect::<Vec<_>>());
        let bytes = key.to_bytes().unwrap();
        assert_eq!(bytes.len(), key.write_bytes());
        assert_eq!(bytes.len(), 1 + 8 + 4 + 6 * (4 + 8));
        assert_eq!(peek_kind(&bytes).unwrap(), SymbolKind::Char);
        let read = Key::<char>::from_bytes(&bytes).unwrap();
        assert_eq!(read.symbol_count(), 6);
        assert_eq!(read.frequencies().get(&'ż'), Some(1));
        assert_eq!(read, key);
        // a key of char symbols can not be read as a key of bytes
        assert!(matches!(Key::<u8>::from_bytes(&bytes), Err(Error::CorruptKey(_))));
    }

    #[test]
    fn invalid_char() {
        let mut bytes = vec![2];
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&0xD800u32.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        assert!(matches!(Key::<char>::from_bytes(&bytes), Err(Error::CorruptKey(_))));
    }

    #[test]
    fn rebuilds_the_same_tree() {
        let text = b"this is a random test text which got manually written";
        let key = key_for(text);
        let read = Key::<u8>::from_bytes(&key.to_bytes().unwrap()).unwrap();
        assert_eq!(read.tree(), CodeTree::from_frequencies(&FrequencyTable::<u8>::from_symbols(text).unwrap()));
    }

    #[test]
    fn corrupt_keys() {
        assert_corrupt(&[]);
        assert_corrupt(&raw_key(0, 1, &[(b'a', 1)]));  // unknown version
        assert_corrupt(&raw_key(7, 1, &[(b'a', 1)]));  // unknown version
        assert_corrupt(&raw_key(1, 0, &[]));    // no symbols
        assert_corrupt(&raw_key(1, 1, &[(b'a', 1), (b'b', 0)]));    // zero frequency
        assert_corrupt(&raw_key(1, 2, &[(b'b', 1), (b'a', 1)]));    // out of order
        assert_corrupt(&raw_key(1, 2, &[(b'a', 1), (b'a', 1)]));    // repeated symbol
        assert_corrupt(&raw_key(1, 5, &[(b'a', 1), (b'b', 1)]));    // wrong symbol count
        let valid = raw_key(1, 3, &[(b'a', 1), (b'b', 2)]);
        for len in 0..valid.len() { assert_corrupt(&valid[..len]); }   // truncated
        let mut trailing = valid.clone();
        trailing.push(0);
        assert_corrupt(&trailing);
        assert!(Key::<u8>::from_bytes(&valid).is_ok());
    }

    #[test]
    fn peek_unknown() {
        assert!(matches!(peek_kind(&[]), Err(Error::CorruptKey(_))));
        assert!(matches!(peek_kind(&[9]), Err(Error::CorruptKey(_))));
    }
}
