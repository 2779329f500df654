use std::{hint::black_box, time::Instant};

use anyhow::{bail, Context};
use dyn_size_of::GetSize;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;
use static_huffman::{decode, encode, CodeTable, CodeTree, FrequencyTable};

use crate::BenchConf;

impl BenchConf {
    /// Returns pseudo-random text for testing, its characters drawn uniformly from the alphabet.
    fn rand_text(&self) -> anyhow::Result<Vec<char>> {
        let alphabet: Vec<char> = self.alphabet.chars().collect();
        if alphabet.is_empty() { bail!("the alphabet is empty"); }
        if self.len == 0 { bail!("the text length must be positive"); }
        let dist = Uniform::new(0, alphabet.len());
        let rng = Pcg64Mcg::seed_from_u64(self.seed);
        Ok(dist.sample_iter(rng).map(|i| alphabet[i]).take(self.len).collect())
    }

    /// Returns average time (in seconds) of calling `f`, after warming up for `self.time` seconds.
    #[inline(always)] fn measure<R, F>(&self, mut f: F) -> f64
     where F: FnMut() -> R
    {
        let mut iters = 1;
        if self.time > 0 {
            let time = Instant::now();
            loop {
                black_box(f());
                if time.elapsed().as_secs() > self.time as u64 { break; }
                iters += 1;
            }
        }
        let start_moment = Instant::now();
        for _ in 0..iters { black_box(f()); }
        start_moment.elapsed().as_secs_f64() / iters as f64
    }

    /// Prints the speed of processing the test text in `sec` seconds.
    fn print_speed(&self, label: &str, sec: f64) {
        let msymbols = self.len as f64 / 1_000_000.0;
        println!("{}: {:.0} ns, {:.2} million symbols/sec", label, sec * 1e9, msymbols / sec);
    }
}

/// Prints whether `decoded` equals `original`, and the first difference if not.
fn compare_texts(original: &[char], decoded: &[char]) {
    if original.len() == decoded.len() {
        for (i, (e, g)) in original.iter().zip(decoded).enumerate() {
            if e != g {
                println!("FAIL: decoded text at index {} has {:?}, while the original has {:?}", i, g, e);
                return;
            }
        }
    } else {
        println!("FAIL: decoded text has length {} different from original {}", decoded.len(), original.len());
        return;
    }
    println!("DONE")
}

pub fn benchmark(conf: &BenchConf) -> anyhow::Result<()> {
    let text = conf.rand_text()?;
    println!("Text of {} symbols over {} distinct characters, seed {}", text.len(), conf.alphabet.chars().count(), conf.seed);

    conf.print_speed("Counting symbol occurrences", conf.measure(|| FrequencyTable::<char>::from_symbols(&text)));
    let frequencies = FrequencyTable::<char>::from_symbols(&text).context("counting symbols")?;
    println!("Entropy [bits/symbol]: {:.4}", frequencies.entropy());

    let tree_ns = conf.measure(|| CodeTree::from_frequencies(&frequencies)) * 1e9;
    let tree = CodeTree::from_frequencies(&frequencies);
    let table_ns = conf.measure(|| CodeTable::from_tree(&tree)) * 1e9;
    let table = CodeTable::from_tree(&tree);
    println!("Code tree + code table construction time [ns]: {:.0} + {:.0} = {:.0}", tree_ns, table_ns, tree_ns + table_ns);
    println!("Code tree size [bytes]: {}, height: {}", tree.size_bytes(), tree.height());

    let payload_bits = table.encoded_bits(&frequencies)?;
    println!("Average codeword length [bits/symbol]: {:.4}", payload_bits as f64 / text.len() as f64);

    conf.print_speed("Encoding", conf.measure(|| encode(&text)));
    let encoded = encode(&text).context("encoding")?;
    println!("Payload size [bytes]: {}, key size [bytes]: {}", encoded.payload.len(), encoded.key.write_bytes());

    conf.print_speed("Decoding", conf.measure(|| decode(&encoded.payload, &encoded.key)));

    if conf.verify {
        print!("Verification... ");
        let decoded = decode(&encoded.payload, &encoded.key).context("decoding")?;
        compare_texts(&text, &decoded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(len: usize, alphabet: &str) -> BenchConf {
        BenchConf { len, alphabet: alphabet.to_owned(), time: 0, verify: true, seed: 1234 }
    }

    #[test]
    fn rand_text() {
        let text = conf(1000, "abc").rand_text().unwrap();
        assert_eq!(text.len(), 1000);
        assert!(text.iter().all(|c| "abc".contains(*c)));
        assert_eq!(text, conf(1000, "abc").rand_text().unwrap());
        assert!(conf(1000, "").rand_text().is_err());
        assert!(conf(0, "abc").rand_text().is_err());
    }

    #[test]
    fn quick_benchmark() {
        benchmark(&conf(500, "qwertyuiopasdfghjklzxcvbnm")).unwrap();
        benchmark(&conf(10, "x")).unwrap();
    }
}
