use crate::parser::{tokenize, Position, WordSpan};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Parse markdown and extract checkable text (skip code blocks, inline code, URLs)
pub fn parse(content: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();
    let mut in_code_block = false;
    let mut in_link = false;
    // Where `pos` sits, so each text run only walks the bytes since the last.
    let mut pos = Position::start();
    let mut pos_byte = 0;

    for (event, range) in Parser::new(content).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Link { .. }) => in_link = true,
            Event::End(TagEnd::Link) => in_link = false,
            Event::Text(text) if !in_code_block => {
                // Escapes and entities make the rendered text differ from the
                // source; offsets would be wrong, so leave those runs alone.
                let source = &content[range.clone()];
                if source != text.as_ref() {
                    continue;
                }
                if in_link && (source.starts_with("http://") || source.starts_with("https://")) {
                    continue;
                }
                if range.start < pos_byte {
                    pos = Position::at(content, range.start);
                } else {
                    pos.advance_to(content, pos_byte, range.start);
                }
                pos_byte = range.start;
                spans.extend(tokenize(source, pos));
            }
            _ => {}
        }
    }

    spans
}
