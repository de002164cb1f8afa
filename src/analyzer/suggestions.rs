use crate::analyzer::dictionary::Dictionary;
use std::collections::HashSet;

/// Common single-letter confusions tried as replacements.
const CONFUSABLE: [(char, char); 11] = [
    ('a', 'e'),
    ('e', 'i'),
    ('i', 'o'),
    ('o', 'u'),
    ('b', 'v'),
    ('c', 'k'),
    ('f', 'v'),
    ('g', 'j'),
    ('m', 'n'),
    ('s', 'z'),
    ('t', 'd'),
];

/// Generate spelling suggestions for a lowercase `word`, best first.
///
/// Sources are tried cheapest first and stop once enough candidates are
/// found. Candidates rank by edit distance, then by the source that found
/// them, then by how close their length is.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    let mut pool = Pool::new(word, max_suggestions);

    if let Some(prefix) = char_prefix(word, 3) {
        pool.offer_all(dictionary.words_with_prefix(prefix), 2);
    }

    if !pool.is_full() {
        pool.offer_all(
            single_edits(word).into_iter().filter(|w| dictionary.contains(w)),
            2,
        );
    }

    if !pool.is_full() {
        if let Some(prefix) = char_prefix(word, 2) {
            pool.offer_all(dictionary.words_with_prefix(prefix), 3);
        }
    }

    // Short words rarely share a useful prefix, so scan by length instead.
    if !pool.is_full() && word.chars().count() <= 3 {
        pool.offer_all(dictionary.words_near_length(word.chars().count(), 100), 2);
    }

    pool.ranked()
}

struct Pool<'a> {
    word: &'a str,
    max: usize,
    seen: HashSet<String>,
    /// (distance, source tier, word)
    candidates: Vec<(usize, usize, String)>,
    tier: usize,
}

impl<'a> Pool<'a> {
    fn new(word: &'a str, max: usize) -> Self {
        Self {
            word,
            max,
            seen: HashSet::new(),
            candidates: Vec::new(),
            tier: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.candidates.len() >= self.max
    }

    fn offer_all(&mut self, words: impl IntoIterator<Item = String>, max_distance: usize) {
        for candidate in words {
            if candidate == self.word || self.seen.contains(&candidate) {
                continue;
            }
            let distance = edit_distance(self.word, &candidate);
            if distance <= max_distance {
                self.seen.insert(candidate.clone());
                self.candidates.push((distance, self.tier, candidate));
            }
        }
        self.tier += 1;
    }

    fn ranked(mut self) -> Vec<String> {
        let len = self.word.chars().count();
        self.candidates.sort_by(|(da, ta, a), (db, tb, b)| {
            da.cmp(db)
                .then_with(|| ta.cmp(tb))
                .then_with(|| a.chars().count().abs_diff(len).cmp(&b.chars().count().abs_diff(len)))
                .then_with(|| a.cmp(b))
        });
        self.candidates
            .into_iter()
            .take(self.max)
            .map(|(_, _, word)| word)
            .collect()
    }
}

/// The first `n` characters of `word`, if it has that many.
fn char_prefix(word: &str, n: usize) -> Option<&str> {
    match word.char_indices().nth(n) {
        Some((end, _)) => Some(&word[..end]),
        None if word.chars().count() == n => Some(word),
        None => None,
    }
}

/// Edit distance counting insertions, deletions, substitutions and
/// adjacent transpositions as one edit each.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let width = b.len() + 1;
    let mut matrix = vec![0; (a.len() + 1) * width];
    for i in 0..=a.len() {
        matrix[i * width] = i;
    }
    for j in 0..=b.len() {
        matrix[j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (matrix[(i - 1) * width + j] + 1)
                .min(matrix[i * width + j - 1] + 1)
                .min(matrix[(i - 1) * width + j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(matrix[(i - 2) * width + j - 2] + 1);
            }
            matrix[i * width + j] = best;
        }
    }

    matrix[a.len() * width + b.len()]
}

/// Deletions, adjacent transpositions and common letter confusions.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    for i in 0..chars.len() {
        let mut edit = chars.clone();
        edit.remove(i);
        edits.push(edit.into_iter().collect());
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut edit = chars.clone();
        edit.swap(i, i + 1);
        edits.push(edit.into_iter().collect());
    }

    for (i, &ch) in chars.iter().enumerate() {
        for &(from, to) in &CONFUSABLE {
            if ch == from {
                let mut edit = chars.clone();
                edit[i] = to;
                edits.push(edit.into_iter().collect());
            }
        }
    }

    edits
}
