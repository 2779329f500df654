#![doc = include_str!("../README.md")]

use dyn_size_of::GetSize;

mod error;
pub use error::{Error, Result};
mod io;
mod frequencies;
pub use frequencies::FrequencyTable;
mod tree;
pub use tree::CodeTree;
mod code;
pub use code::{Code, CodeTable};
mod bits;
pub use bits::{BitPacker, BitReader};
mod key;
pub use key::{peek_kind, Key, Symbol, SymbolKind};
mod decoder;
pub use decoder::{decode_symbols, Decoder, DecoderState, DecodingResult};

/// Result of encoding: the payload and the key needed to decode it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Encoded<S> {
    /// Codewords of the encoded symbols, packed into bytes by [`BitPacker`].
    pub payload: Box<[u8]>,
    /// Number of meaningful bits of `payload`, the rest is padding.
    pub payload_bits: u64,
    /// Frequencies of symbols and the number of encoded symbols.
    pub key: Key<S>
}

impl<S> GetSize for Encoded<S> {
    fn size_bytes_dyn(&self) -> usize { self.payload.size_bytes_dyn() }
    const USES_DYN_MEM: bool = true;
}

/// Encodes `symbols` with Huffman code built for their frequencies.
///
/// Returns [`Error::EmptyInput`] if `symbols` is empty.
pub fn encode<S: Symbol>(symbols: &[S]) -> Result<Encoded<S>> {
    encode_with(symbols, |_| {})
}

/// Encodes `symbols` like [`encode`] and additionally passes the code table to `inspect` before packing.
pub fn encode_with<S, F>(symbols: &[S], inspect: F) -> Result<Encoded<S>>
    where S: Symbol, F: FnOnce(&CodeTable<S>)
{
    let frequencies = FrequencyTable::<S>::from_symbols(symbols)?;
    log::debug!("counted {} symbols, {} distinct", frequencies.total(), frequencies.len());
    log::trace!("frequencies: {:?}", frequencies);
    let tree = CodeTree::from_frequencies(&frequencies);
    let table = CodeTable::from_tree(&tree);
    log::trace!("code table: {:?}", table);
    inspect(&table);
    let payload_bits = table.encoded_bits(&frequencies)?;
    let mut packer = BitPacker::with_capacity(payload_bits as usize);
    table.pack(symbols, &mut packer)?;
    let payload = packer.into_bytes();
    log::debug!("encoded into {} bits ({} bytes), longest codeword has {} bits",
        payload_bits, payload.len(), table.max_len());
    Ok(Encoded { payload, payload_bits, key: Key::new(frequencies) })
}

/// Decodes `payload` with the code tree rebuilt from `key`.
///
/// Returns [`Error::TruncatedPayload`] if `payload` is too short for the number of symbols recorded in the `key`.
pub fn decode<S: Symbol>(payload: &[u8], key: &Key<S>) -> Result<Vec<S>> {
    let tree = key.tree();
    log::debug!("decoding {} symbols from {} bytes, code tree of height {}",
        key.symbol_count(), payload.len(), tree.height());
    decode_symbols(&tree, payload, key.symbol_count())
}

/// Encodes characters of `text`.
pub fn encode_str(text: &str) -> Result<Encoded<char>> {
    encode(&text.chars().collect::<Vec<_>>())
}

/// Decodes `payload` encoded by [`encode_str`] and returns the text.
pub fn decode_string(payload: &[u8], key: &Key<char>) -> Result<String> {
    decode(payload, key).map(|chars| chars.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::WeightedIndex;
    use rand::prelude::*;
    use rand_pcg::Pcg64Mcg;

    fn round_trip<S: Symbol>(symbols: &[S]) -> Encoded<S> {
        let encoded = encode(symbols).unwrap();
        assert_eq!(encoded.payload.len() as u64, (encoded.payload_bits + 7) / 8);
        let key = Key::<S>::from_bytes(&encoded.key.to_bytes().unwrap()).unwrap();
        assert_eq!(decode(&encoded.payload, &key).unwrap(), symbols);
        encoded
    }

    #[test]
    fn aaabbc() {
        let encoded = round_trip(b"aaabbc");
        assert_eq!(encoded.payload_bits, 9);
        assert_eq!(encoded.payload.as_ref(), [0b0000_0111, 0b0000_0001]);
        assert_eq!(encoded.key.symbol_count(), 6);
    }

    #[test]
    fn single_symbol() {
        let encoded = round_trip(b"x");
        assert_eq!(encoded.payload_bits, 1);
        assert_eq!(encoded.payload.as_ref(), [0]);
        let encoded = round_trip(b"aaaa");
        assert_eq!(encoded.payload_bits, 4);
        assert!(encoded.key.tree().is_leaf());
    }

    #[test]
    fn empty() {
        assert!(matches!(encode::<u8>(&[]), Err(Error::EmptyInput)));
        assert!(matches!(encode_str(""), Err(Error::EmptyInput)));
    }

    #[test]
    fn texts() {
        for text in ["thIs iS tesT 1", "anoTher Test tExt nuM2", "a",
                     "this is a random test text which got manually written", "zażółć gęślą jaźń"] {
            let encoded = encode_str(text).unwrap();
            assert_eq!(decode_string(&encoded.payload, &encoded.key).unwrap(), text);
            round_trip(text.as_bytes());
        }
    }

    #[test]
    fn all_bytes() {
        let bytes: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).chain(0..10).collect();
        round_trip(&bytes);
    }

    #[test]
    fn random_texts() {
        let mut rng = Pcg64Mcg::seed_from_u64(1234);
        for symbols in [2usize, 3, 26, 100, 256] {
            let weights: Vec<f64> = (1..=symbols as i32).map(|v| 1.1f64.powi(v)).collect();
            let dist = WeightedIndex::new(weights).unwrap();
            for len in [1usize, 7, 64, 1000] {
                let text: Vec<u8> = (&dist).sample_iter(&mut rng).map(|v| v as u8).take(len).collect();
                round_trip(&text);
            }
        }
    }

    #[test]
    fn diagnostic_hook() {
        let mut printed = Vec::new();
        let encoded = encode_with(b"aaabbc", |table| {
            printed = table.iter().map(|(symbol, code)| format!("{}:{}", *symbol as char, code)).collect();
        }).unwrap();
        assert_eq!(printed, ["a:1", "b:00", "c:01"]);
        assert_eq!(encoded, encode(b"aaabbc").unwrap());
    }

    #[test]
    fn deterministic() {
        let text = b"abracadabra, simsalabim";
        assert_eq!(encode(text).unwrap(), encode(text).unwrap());
        let mut shuffled = text.to_vec();
        shuffled.shuffle(&mut Pcg64Mcg::seed_from_u64(7));
        let table = |symbols: &[u8]| CodeTable::from_tree(&CodeTree::from_frequencies(&FrequencyTable::<u8>::from_symbols(symbols).unwrap()));
        assert_eq!(table(text), table(&shuffled));
    }

    #[test]
    fn truncated_payload() {
        let encoded = encode(b"abracadabra").unwrap();
        let cut = &encoded.payload[..encoded.payload.len() - 1];
        assert!(matches!(decode(cut, &encoded.key), Err(Error::TruncatedPayload { expected: 11, .. })));
    }

    #[test]
    fn memory() {
        let encoded = encode(b"abracadabra").unwrap();
        assert_eq!(encoded.size_bytes_dyn(), encoded.payload.len());
    }
}
