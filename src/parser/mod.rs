pub mod markdown;
pub mod plaintext;

use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    Markdown,
    #[default]
    PlainText,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "mdx" | "markdown" => FileType::Markdown,
            _ => FileType::PlainText,
        }
    }
}

/// A checkable word. `start`/`end` are character offsets into the parsed
/// text; `line`/`column` are 1-based and only used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

/// Extract words from `content` according to its format.
pub fn parse(content: &str, file_type: FileType) -> Vec<WordSpan> {
    match file_type {
        FileType::Markdown => markdown::parse(content),
        FileType::PlainText => plaintext::parse(content),
    }
}

/// Character position plus display line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub char: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            char: 0,
            line: 1,
            column: 1,
        }
    }

    /// Position of byte offset `byte` within `content`.
    pub fn at(content: &str, byte: usize) -> Self {
        let mut pos = Self::start();
        pos.advance(&content[..byte]);
        pos
    }

    /// Move forward through `content` from byte `from` (where `self` sits)
    /// to byte `to`.
    pub fn advance_to(&mut self, content: &str, from: usize, to: usize) {
        self.advance(&content[from..to]);
    }

    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            self.char += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

/// Split `text` (which begins at `base`) into word spans.
pub(crate) fn tokenize(text: &str, base: Position) -> Vec<WordSpan> {
    let mut spans = Vec::new();
    let mut pos = base;

    for segment in text.split_word_bounds() {
        let is_word = segment.chars().next().is_some_and(char::is_alphabetic);
        if is_word {
            for (from, to) in split_compound_word(segment) {
                if to - from < 2 {
                    continue;
                }
                spans.push(WordSpan {
                    text: segment.chars().skip(from).take(to - from).collect(),
                    start: pos.char + from,
                    end: pos.char + to,
                    line: pos.line,
                    column: pos.column + from,
                });
            }
        }
        pos.advance(segment);
    }

    spans
}

/// Character ranges of the parts of a camelCase, snake_case or kebab-case
/// word.
pub(crate) fn split_compound_word(word: &str) -> Vec<(usize, usize)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;

    for (i, ch) in word.chars().enumerate() {
        if ch == '_' || ch == '-' {
            if i > start {
                parts.push((start, i));
            }
            start = i + 1;
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && i > start {
            parts.push((start, i));
            start = i;
        }
        prev_lower = ch.is_lowercase();
    }

    let len = word.chars().count();
    if len > start {
        parts.push((start, len));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(
            FileType::from_path(&PathBuf::from("test.md")),
            FileType::Markdown
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("notes.txt")),
            FileType::PlainText
        );
        assert_eq!(FileType::from_path(&PathBuf::from("README")), FileType::PlainText);
    }

    #[test]
    fn test_compound_splitting() {
        assert_eq!(split_compound_word("camelCaseWord"), vec![(0, 5), (5, 9), (9, 13)]);
        assert_eq!(split_compound_word("snake_case"), vec![(0, 5), (6, 10)]);
        assert_eq!(split_compound_word("HTML"), vec![(0, 4)]);
        assert_eq!(split_compound_word("plain"), vec![(0, 5)]);
    }

    #[test]
    fn test_tokenize_offsets_are_characters() {
        let spans = tokenize("über camelCase", Position::start());
        let words: Vec<_> = spans.iter().map(|s| (s.text.as_str(), s.start, s.end)).collect();
        assert_eq!(words, vec![("über", 0, 4), ("camel", 5, 10), ("Case", 10, 14)]);
        assert_eq!(spans[2].column, 11);
    }

    #[test]
    fn test_position_tracks_lines() {
        let pos = Position::at("ab\ncd", 4);
        assert_eq!(pos, Position { char: 4, line: 2, column: 2 });
    }
}
