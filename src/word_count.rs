//! Word frequency counting on top of [`HashMap`].
//!
//! Text is split into maximal runs of ASCII letters. Every run is lowercased
//! and counted; everything else (digits, punctuation, non-ASCII bytes)
//! separates words.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::hash_map::HashMap;
use crate::strategy::HashStrategy;

/// Splits `text` into lowercase words made of ASCII letters.
///
/// # Examples
///
/// ```rust
/// use lin_hash::word_count::tokenize;
///
/// let words: Vec<String> = tokenize("\"The time has come,\" the Walrus said").collect();
/// assert_eq!(words, ["the", "time", "has", "come", "the", "walrus", "said"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
}

/// Counts word occurrences.
///
/// # Examples
///
/// ```rust
/// use lin_hash::word_count::WordCounter;
///
/// let mut counter = WordCounter::new();
/// counter.add_text("to be, or not to be");
///
/// assert_eq!(counter.count("be"), 2);
/// assert_eq!(counter.distinct(), 4);
/// assert_eq!(counter.report().to_string(), "2 be\n2 to\n1 not\n1 or\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordCounter {
    counts: HashMap<String, u32>,
    total: u64,
}

impl WordCounter {
    /// Creates an empty counter using the default hash strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty counter whose table probes with `strategy`.
    pub fn with_strategy(strategy: HashStrategy) -> Self {
        Self {
            counts: HashMap::with_strategy(strategy),
            total: 0,
        }
    }

    /// Counts every word in `text`.
    pub fn add_text(&mut self, text: &str) {
        for word in tokenize(text) {
            *self.counts.get_mut(word) += 1;
            self.total += 1;
        }
    }

    /// Counts every word read from `reader`, line by line.
    ///
    /// Lines are split on `\n`, so a word never spans two lines.
    #[cfg(feature = "std")]
    pub fn add_reader<R: std::io::BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            self.add_text(&line?);
        }
        Ok(())
    }

    /// Number of occurrences of `word` (which must already be lowercase).
    pub fn count(&self, word: &str) -> u32 {
        *self.counts.get_or(word, &0)
    }

    /// Number of distinct words seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of words seen, counting repeats.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the underlying map.
    pub fn counts(&self) -> &HashMap<String, u32> {
        &self.counts
    }

    /// Returns all words sorted by count (highest first), ties broken by the
    /// word in ascending order.
    pub fn report(&self) -> Report<'_> {
        let mut rows: Vec<(&str, u32)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        rows.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Report { rows }
    }
}

impl Extend<String> for WordCounter {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for word in iter {
            *self.counts.get_mut(word) += 1;
            self.total += 1;
        }
    }
}

/// Sorted word counts, rendered one `"<count> <word>"` line per word.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    rows: Vec<(&'a str, u32)>,
}

impl<'a> Report<'a> {
    /// The sorted `(word, count)` rows.
    pub fn rows(&self) -> &[(&'a str, u32)] {
        &self.rows
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (word, count) in &self.rows {
            writeln!(f, "{count} {word}")?;
        }
        Ok(())
    }
}
