//! Paragraph reflow applied to corrected text when it is written out.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.?!]+\s+").unwrap();
}

/// Regroup `text` into tab-indented paragraphs of `sentences_per_paragraph`
/// sentences each. Sentences keep their own terminators.
pub fn reflow(text: &str, sentences_per_paragraph: u32) -> String {
    let per_paragraph = sentences_per_paragraph.max(1) as usize;

    let mut sentences = Vec::new();
    let mut start = 0;
    for end in SENTENCE_END.find_iter(text) {
        let sentence = text[start..end.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = end.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
        .chunks(per_paragraph)
        .map(|paragraph| format!("\t{}", paragraph.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}
