//! Tools to count frequencies of symbols.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::Debug;
use fsum::FSum;

use crate::{Error, Result};

/// Numbers of occurrences of distinct symbols, in ascending order of symbols.
///
/// Every stored number is positive and the table is never empty.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FrequencyTable<S> {
    counts: BTreeMap<S, u64>,
    /// Sum of all counts, i.e. the length of the counted sequence.
    total: u64
}

impl<S: Ord + Clone> FrequencyTable<S> {
    /// Counts occurrences of all symbols exposed by `symbols`, in a single pass.
    ///
    /// Returns [`Error::EmptyInput`] if `symbols` is empty.
    pub fn from_symbols<Iter>(symbols: Iter) -> Result<Self>
        where Iter: IntoIterator, Iter::Item: Borrow<S>
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for symbol in symbols {
            *counts.entry(symbol.borrow().clone()).or_insert(0u64) += 1;
            total += 1;
        }
        if total == 0 { return Err(Error::EmptyInput); }
        Ok(Self { counts, total })
    }
}

impl<S: Ord + Debug> FrequencyTable<S> {
    /// Constructs the table from explicitly given `(symbol, number of occurrences)` pairs.
    ///
    /// Returns [`Error::CorruptKey`] if there are no pairs, some number is zero,
    /// some symbol is repeated or the numbers sum up to more than `u64::MAX`.
    pub fn from_counts<Iter>(pairs: Iter) -> Result<Self>
        where Iter: IntoIterator<Item = (S, u64)>
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(Error::CorruptKey(format!("symbol {:?} has zero frequency", symbol)));
            }
            total = total.checked_add(count)
                .ok_or_else(|| Error::CorruptKey("sum of frequencies overflows".to_owned()))?;
            if counts.contains_key(&symbol) {
                return Err(Error::CorruptKey(format!("symbol {:?} is repeated", symbol)));
            }
            counts.insert(symbol, count);
        }
        if counts.is_empty() { return Err(Error::CorruptKey("no symbols".to_owned())); }
        Ok(Self { counts, total })
    }
}

impl<S: Ord> FrequencyTable<S> {
    /// Returns the number of distinct symbols.
    #[inline] pub fn len(&self) -> usize { self.counts.len() }

    /// Always returns `false`, the table contains at least one symbol.
    #[inline] pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    /// Returns the total number of occurrences of all symbols.
    #[inline] pub fn total(&self) -> u64 { self.total }

    /// Returns the number of occurrences of `symbol` or `None` if it does not occur.
    #[inline] pub fn get(&self, symbol: &S) -> Option<u64> { self.counts.get(symbol).copied() }

    /// Returns an iterator over `(symbol, number of occurrences)` pairs, in ascending order of symbols.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&S, u64)> + '_ {
        self.counts.iter().map(|(symbol, count)| (symbol, *count))
    }

    /// Returns the Shannon entropy (in bits per symbol) of the counted symbols.
    pub fn entropy(&self) -> f64 {
        let total = self.total as f64;
        - FSum::with_all(self.counts.values()
            .map(|c| { let p = *c as f64 / total; p * p.log2() })).value()
    }
}
