//! Packing codewords into bytes and reading them back.
//!
//! Bit number `i` of the stream is stored at the bit `i % 8` (counting from the least significant one)
//! of the byte `i / 8`. The last byte is padded with zeros.

use bitm::{BitAccess, BitVec, ceiling_div};

use crate::Code;

/// Growing sequence of bits.
#[derive(Default)]
pub struct BitPacker {
    words: Box<[u64]>,
    /// Number of bits pushed.
    len: usize
}

impl BitPacker {
    /// Constructs empty `BitPacker`.
    pub fn new() -> Self { Self::default() }

    /// Constructs empty `BitPacker` that can hold `bits` bits without reallocation.
    pub fn with_capacity(bits: usize) -> Self {
        Self { words: Box::<[u64]>::with_zeroed_bits(bits), len: 0 }
    }

    /// Returns the number of bits pushed so far.
    #[inline] pub fn len(&self) -> usize { self.len }

    /// Returns whether no bit has been pushed.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Appends `bit`.
    #[inline] pub fn push(&mut self, bit: bool) {
        if self.len == self.words.len() * 64 { self.grow(); }
        if bit { self.words.set_bit(self.len); }
        self.len += 1;
    }

    /// Appends all bits of `code`.
    #[inline] pub fn push_code(&mut self, code: Code) {
        for bit in code.iter() { self.push(bit); }
    }

    /// Returns the bits as bytes; the last byte is padded with zeros.
    pub fn into_bytes(self) -> Box<[u8]> {
        self.words.iter()
            .flat_map(|word| word.to_le_bytes())
            .take(ceiling_div(self.len, 8))
            .collect()
    }

    fn grow(&mut self) {
        let mut words = std::mem::take(&mut self.words).into_vec();
        words.resize((words.len() * 2).max(1), 0);
        self.words = words.into_boxed_slice();
    }
}

/// Iterator over the bits of a byte buffer.
pub struct BitReader {
    words: Box<[u64]>,
    /// Index of the next bit.
    position: usize,
    /// Number of bits in the buffer.
    len: usize
}

impl BitReader {
    /// Constructs `BitReader` over all bits of `bytes`.
    pub fn new(bytes: &[u8]) -> Self {
        let len = bytes.len() * 8;
        let mut words = Box::<[u64]>::with_zeroed_bits(len);
        for (word, chunk) in words.iter_mut().zip(bytes.chunks(8)) {
            let mut buff = [0u8; 8];
            buff[..chunk.len()].copy_from_slice(chunk);
            *word = u64::from_le_bytes(buff);
        }
        Self { words, position: 0, len }
    }

    /// Returns the number of bits read so far.
    #[inline] pub fn consumed(&self) -> usize { self.position }

    /// Returns the number of bits not read yet.
    #[inline] pub fn remaining(&self) -> usize { self.len - self.position }
}

impl Iterator for BitReader {
    type Item = bool;

    #[inline] fn next(&mut self) -> Option<bool> {
        (self.position < self.len).then(|| {
            self.position += 1;
            self.words.get_bit(self.position - 1)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for BitReader {}
