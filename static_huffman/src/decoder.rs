use crate::{BitReader, CodeTree, Error, Result};

/// State of the [`Decoder`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum DecoderState {
    /// At the root, before the first bit of a codeword.
    AtRoot,
    /// At an internal node, inside a codeword.
    Descending,
    /// A symbol has just been emitted; the next bit starts a new codeword from the root.
    SymbolEmitted,
    /// All expected symbols have been emitted.
    Done
}

/// Result of bit decoding returned by [`Decoder::consume`].
#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone, Hash)]
pub enum DecodingResult<T> {
    /// Completed symbol that has been successfully decoded.
    Value(T),
    /// The codeword is incomplete and the next bit is needed.
    Incomplete,
    /// The bit cannot be consumed: all expected symbols have been emitted already
    /// or the tree has no internal node to descend from.
    Invalid
}

/// Decoder that walks the code tree, consuming one bit at a time,
/// and emits exactly the expected number of symbols.
///
/// Bit `1` selects the left child, `0` the right one.
pub struct Decoder<'tree, S> {
    tree: &'tree CodeTree<S>,
    /// Current node.
    node: &'tree CodeTree<S>,
    state: DecoderState,
    /// Number of symbols emitted so far.
    emitted: u64,
    /// Number of symbols to emit.
    expected: u64
}

impl<'tree, S> Decoder<'tree, S> {
    /// Constructs decoder that emits `expected` symbols coded with the given `tree`.
    pub fn new(tree: &'tree CodeTree<S>, expected: u64) -> Self {
        Self {
            tree,
            node: tree,
            state: if expected == 0 { DecoderState::Done } else { DecoderState::AtRoot },
            emitted: 0,
            expected
        }
    }

    /// Returns the current state.
    #[inline] pub fn state(&self) -> DecoderState { self.state }

    /// Returns the number of symbols emitted so far.
    #[inline] pub fn emitted(&self) -> u64 { self.emitted }

    /// Consumes a `bit` of the codeword and returns:
    /// - a symbol if the given `bit` finishes the codeword;
    /// - an [`DecodingResult::Incomplete`] if the codeword is incomplete and the next bit is needed;
    /// - or [`DecodingResult::Invalid`] if the decoder is [`DecoderState::Done`]
    ///     or it is at a leaf (which happens only for the tree consisting of a single leaf).
    pub fn consume(&mut self, bit: bool) -> DecodingResult<&'tree S> {
        if self.state == DecoderState::Done { return DecodingResult::Invalid; }
        let node: &'tree CodeTree<S> = self.node;
        let next: &'tree CodeTree<S> = match node {
            CodeTree::Internal { left, right, .. } => if bit { &**left } else { &**right },
            CodeTree::Leaf { .. } => return DecodingResult::Invalid
        };
        match next {
            CodeTree::Leaf { symbol, .. } => {
                self.emitted += 1;
                self.node = self.tree;
                self.state = if self.emitted == self.expected { DecoderState::Done } else { DecoderState::SymbolEmitted };
                DecodingResult::Value(symbol)
            }
            CodeTree::Internal { .. } => {
                self.node = next;
                self.state = DecoderState::Descending;
                DecodingResult::Incomplete
            }
        }
    }
}

/// Decodes `expected` symbols from the `payload` coded with the given `tree`.
///
/// The bits that follow the last expected codeword (padding) are ignored.
/// If `tree` is a single leaf, its symbol is repeated `expected` times and the bits are not read
/// (the `payload` is only checked to have one bit per symbol).
///
/// Returns [`Error::TruncatedPayload`] if the `payload` ends before `expected` symbols are decoded.
pub fn decode_symbols<S: Clone>(tree: &CodeTree<S>, payload: &[u8], expected: u64) -> Result<Vec<S>> {
    let payload_bits = payload.len() as u64 * 8;
    if let CodeTree::Leaf { symbol, .. } = tree {
        if payload_bits < expected {
            return Err(Error::TruncatedPayload { expected, decoded: payload_bits });
        }
        return Ok(vec![symbol.clone(); expected as usize]);
    }
    let mut result = Vec::with_capacity(expected.min(payload_bits) as usize);
    let mut decoder = Decoder::new(tree, expected);
    let mut bits = BitReader::new(payload);
    while decoder.state() != DecoderState::Done {
        let Some(bit) = bits.next() else {
            return Err(Error::TruncatedPayload { expected, decoded: decoder.emitted() });
        };
        match decoder.consume(bit) {
            DecodingResult::Value(symbol) => result.push(symbol.clone()),
            DecodingResult::Incomplete => {},
            DecodingResult::Invalid => return Err(Error::TreeTraversal { decoded: decoder.emitted() })
        }
    }
    Ok(result)
}
