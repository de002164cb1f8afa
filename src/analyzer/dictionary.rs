use crate::config::Dirs;
use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, warn};

/// Lowercase word list backed by an FST.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for `language`, falling back to a small
    /// built-in list when none is installed.
    pub fn load(language: &str, dirs: &Dirs) -> Result<Self> {
        let dict_path = dirs.dictionary(language);

        if !dict_path.exists() {
            warn!(
                language,
                "no installed dictionary, using the built-in word list (run `corrector dict download {language}`)"
            );
            return Self::from_words(BOOTSTRAP_WORDS.iter().copied());
        }

        Self::load_from_path(&dict_path)
    }

    /// Load dictionary from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;
        let set = Set::new(bytes)
            .with_context(|| format!("Failed to parse dictionary: {}", path.display()))?;

        debug!(path = %path.display(), words = set.len(), "dictionary loaded");
        Ok(Self { set })
    }

    /// Build an in-memory dictionary.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = Set::from_iter(sorted_unique(words)).context("Failed to build dictionary")?;
        Ok(Self { set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Words whose length is within one character of `len`.
    ///
    /// Walks the whole set; only worth it for very short words.
    pub fn words_near_length(&self, len: usize, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            let Ok(word) = std::str::from_utf8(key) else { continue };
            if word.chars().count().abs_diff(len) <= 1 {
                results.push(word.to_string());
                if results.len() >= limit {
                    break;
                }
            }
        }

        results
    }

    /// Write a dictionary file from an unsorted word list.
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<usize> {
        let words = sorted_unique(words);

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;
        let mut builder =
            SetBuilder::new(BufWriter::new(file)).context("Failed to create FST builder")?;

        for word in &words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(words.len())
    }
}

fn sorted_unique<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

/// Enough common English to be useful before a real list is downloaded.
const BOOTSTRAP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "as", "at", "back", "be",
    "because", "but", "by", "can", "cat", "come", "could", "day", "do", "dog", "even", "first",
    "for", "from", "get", "give", "go", "good", "have", "he", "her", "him", "his", "how", "i",
    "if", "in", "into", "it", "its", "just", "know", "like", "look", "make", "me", "most", "my",
    "new", "no", "not", "now", "of", "on", "one", "only", "or", "other", "our", "out", "over",
    "people", "say", "see", "she", "so", "some", "take", "text", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "think", "this", "time", "to", "two",
    "up", "us", "use", "want", "way", "we", "well", "what", "when", "which", "who", "will",
    "with", "word", "work", "would", "year", "you", "your",
];
