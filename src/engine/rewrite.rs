use crate::engine::EngineError;

/// Result of splicing a replacement into a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub buffer: String,
    /// Length change in characters: `len(replacement) - (to - from)`.
    pub delta: isize,
}

/// Replace the characters in `[from, to)` of `buffer` with `replacement`.
///
/// Positions are character indices, not byte offsets.
pub fn splice(buffer: &str, from: usize, to: usize, replacement: &str) -> Result<Splice, EngineError> {
    let len = char_len(buffer);
    if from > to || to > len {
        tracing::error!(from, to, len, "rejected out-of-bounds splice");
        return Err(EngineError::InvalidSpan { from, to, len });
    }

    let start = byte_offset(buffer, from);
    let end = start + byte_offset(&buffer[start..], to - from);

    let mut out = String::with_capacity(buffer.len() - (end - start) + replacement.len());
    out.push_str(&buffer[..start]);
    out.push_str(replacement);
    out.push_str(&buffer[end..]);

    Ok(Splice {
        buffer: out,
        delta: char_len(replacement) as isize - (to - from) as isize,
    })
}

/// Copy out the characters in `[from, to)`.
pub fn slice(buffer: &str, from: usize, to: usize) -> Result<&str, EngineError> {
    let len = char_len(buffer);
    if from > to || to > len {
        return Err(EngineError::InvalidSpan { from, to, len });
    }
    let start = byte_offset(buffer, from);
    let end = start + byte_offset(&buffer[start..], to - from);
    Ok(&buffer[start..end])
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `index`th character. `index` may equal the char count.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_same_length() {
        let out = splice("teh cat", 0, 3, "the").unwrap();
        assert_eq!(out.buffer, "the cat");
        assert_eq!(out.delta, 0);
    }

    #[test]
    fn test_splice_grows_and_shrinks() {
        let grown = splice("the dog", 4, 7, "hound").unwrap();
        assert_eq!(grown.buffer, "the hound");
        assert_eq!(grown.delta, 2);

        let shrunk = splice(&grown.buffer, 4, 9, "ox").unwrap();
        assert_eq!(shrunk.buffer, "the ox");
        assert_eq!(shrunk.delta, -3);
    }

    #[test]
    fn test_pure_insertion_and_deletion() {
        let inserted = splice("ab", 1, 1, "XY").unwrap();
        assert_eq!(inserted.buffer, "aXYb");
        assert_eq!(inserted.delta, 2);

        let deleted = splice("abc", 0, 3, "").unwrap();
        assert_eq!(deleted.buffer, "");
        assert_eq!(deleted.delta, -3);
    }

    #[test]
    fn test_positions_are_characters() {
        // "é" and "ß" are two bytes each.
        let out = splice("café straße", 5, 11, "Strasse").unwrap();
        assert_eq!(out.buffer, "café Strasse");
        assert_eq!(out.delta, 1);
        assert_eq!(slice("café straße", 3, 4).unwrap(), "é");
    }

    #[test]
    fn test_invalid_spans() {
        assert_eq!(
            splice("abc", 2, 1, "x"),
            Err(EngineError::InvalidSpan { from: 2, to: 1, len: 3 })
        );
        assert_eq!(
            splice("abc", 1, 4, "x"),
            Err(EngineError::InvalidSpan { from: 1, to: 4, len: 3 })
        );
        assert!(slice("abc", 4, 4).is_err());
        // A span ending exactly at the end is fine.
        assert_eq!(splice("abc", 3, 3, "d").unwrap().buffer, "abcd");
    }
}
