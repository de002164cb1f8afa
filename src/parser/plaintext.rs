use crate::parser::{tokenize, Position, WordSpan};

/// Parse plain text and extract all words
pub fn parse(content: &str) -> Vec<WordSpan> {
    tokenize(content, Position::start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_parsing() {
        let content = "Hello world! This is a test.";
        let spans = parse(content);

        // Single-character words like "a" are dropped
        let words: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(words, vec!["Hello", "world", "This", "is", "test"]);
        assert_eq!((spans[1].start, spans[1].end), (6, 11));
    }

    #[test]
    fn test_contractions_stay_whole() {
        let spans = parse("don't stop");
        assert_eq!(spans[0].text, "don't");
        assert_eq!(spans[1].start, 6);
    }

    #[test]
    fn test_numbers_skipped() {
        let spans = parse("42 apples and 7");
        let words: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(words, vec!["apples", "and"]);
    }

    #[test]
    fn test_multiline() {
        let content = "First line\nSecond line\nThird line";
        let spans = parse(content);

        assert!(spans.iter().any(|s| s.line == 1));
        assert!(spans.iter().any(|s| s.line == 2));
        assert!(spans.iter().any(|s| s.line == 3));

        let second = spans.iter().find(|s| s.text == "Second").unwrap();
        assert_eq!((second.start, second.column), (11, 1));
    }
}
