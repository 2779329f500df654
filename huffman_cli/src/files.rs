use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use static_huffman::{decode as decode_symbols, encode_with, peek_kind, CodeTable, Encoded, Key, Symbol, SymbolKind};

/// Returns the path of the key file that accompanies the `payload` file: `payload` with `.key` appended.
pub fn key_path(payload: &Path) -> PathBuf {
    let mut name = OsString::from(payload.as_os_str());
    name.push(".key");
    PathBuf::from(name)
}

/// Prints the codeword of each symbol.
fn print_codes<S: Symbol>(table: &CodeTable<S>) {
    println!("{} symbols, codewords up to {} bits:", table.len(), table.max_len());
    for (symbol, code) in table.iter() {
        println!("{:?}\t{}", symbol, code);
    }
}

/// Writes the payload of `encoded` to `output` and its key to `key`.
fn write_encoded<S: Symbol>(encoded: &Encoded<S>, output: &Path, key: &Path) -> anyhow::Result<()> {
    fs::write(output, &encoded.payload).with_context(|| format!("writing payload to {}", output.display()))?;
    let key_bytes = encoded.key.to_bytes().context("serializing key")?;
    fs::write(key, key_bytes).with_context(|| format!("writing key to {}", key.display()))?;
    Ok(())
}

/// Compresses the `input` file; writes the payload to `output` and the key to `output.key`.
pub fn encode(input: &Path, output: &Path, text: bool, show_codes: bool) -> anyhow::Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading from {}", input.display()))?;
    let key = key_path(output);
    let original_len = bytes.len();
    let (payload_len, key_len) = if text {
        let text = String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8 text", input.display()))?;
        let chars: Vec<char> = text.chars().collect();
        let encoded = encode_with(&chars, |table| if show_codes { print_codes(table) })
            .with_context(|| format!("encoding {}", input.display()))?;
        write_encoded(&encoded, output, &key)?;
        (encoded.payload.len(), encoded.key.write_bytes())
    } else {
        let encoded = encode_with(&bytes, |table| if show_codes { print_codes(table) })
            .with_context(|| format!("encoding {}", input.display()))?;
        write_encoded(&encoded, output, &key)?;
        (encoded.payload.len(), encoded.key.write_bytes())
    };
    log::info!("{} bytes compressed to {} bytes of payload and {} bytes of key", original_len, payload_len, key_len);
    println!("{} -> {} ({} bytes) + {} ({} bytes)", input.display(), output.display(), payload_len, key.display(), key_len);
    Ok(())
}

/// Decodes `payload` with the given `key` bytes.
fn decode_with<S: Symbol>(payload: &[u8], key: &[u8]) -> anyhow::Result<Vec<S>> {
    let key = Key::<S>::from_bytes(key).context("reading key")?;
    decode_symbols(payload, &key).context("decoding payload")
}

/// Decompresses the `payload` file with the `key` file and writes the result to `output`.
pub fn decode(payload: &Path, key: &Path, output: &Path) -> anyhow::Result<()> {
    let payload_bytes = fs::read(payload).with_context(|| format!("reading payload from {}", payload.display()))?;
    let key_bytes = fs::read(key).with_context(|| format!("reading key from {}", key.display()))?;
    let decoded = match peek_kind(&key_bytes).with_context(|| format!("reading key from {}", key.display()))? {
        SymbolKind::Byte => decode_with::<u8>(&payload_bytes, &key_bytes)?,
        SymbolKind::Char => decode_with::<char>(&payload_bytes, &key_bytes)?
            .into_iter().collect::<String>().into_bytes(),
    };
    fs::write(output, &decoded).with_context(|| format!("writing to {}", output.display()))?;
    log::info!("{} bytes of payload decompressed to {} bytes", payload_bytes.len(), decoded.len());
    println!("{} + {} -> {} ({} bytes)", payload.display(), key.display(), output.display(), decoded.len());
    Ok(())
}
