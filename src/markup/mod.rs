//! Markup parsing.
//!
//! ```text
//! raw text ──► extract_head() ──► Lexer ──► assemble() ──► (Head, Document)
//!              front matter       tokens    blocks
//! ```
//!
//! Parsing is pure: the same text always yields the same result.

pub mod block;
pub mod head;
pub mod inline;
pub mod lexer;

pub use block::{Block, Document};
pub use head::{Head, ParseError};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a full document into its head and blocks.
pub fn parse(input: &str) -> Result<(Head, Document), ParseError> {
    let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);
    let lines: Vec<&str> = input.lines().collect();
    let (head, body) = head::extract_head(&lines)?;
    let document = block::assemble(lexer::Lexer::new(body.iter().copied()));
    Ok((head, document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_document() {
        let input = "@ Home\n@use site.css\n\n# Welcome\n\nHello **world**!\n";
        let (head, document) = parse(input).unwrap();

        assert_eq!(head.title.as_deref(), Some("Home"));
        assert_eq!(head.css, vec!["site.css"]);
        assert_eq!(
            document,
            vec![
                Block::Header {
                    level: 1,
                    text: "Welcome".into()
                },
                Block::Paragraph {
                    lines: vec!["Hello **world**!".into()]
                },
            ]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "@ T\n- a\n- b\n\n```\ncode\n```\n$| 1 |$\n";
        assert_eq!(parse(input).unwrap(), parse(input).unwrap());
    }

    #[test]
    fn test_crlf_line_endings() {
        let (_, document) = parse("# A\r\ntext\r\n").unwrap();
        assert_eq!(
            document,
            vec![
                Block::Header {
                    level: 1,
                    text: "A".into()
                },
                Block::Paragraph {
                    lines: vec!["text".into()]
                },
            ]
        );
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        let (head, document) = parse("\u{feff}@ Home\n@be main\n# A").unwrap();
        assert_eq!(head.title.as_deref(), Some("Home"));
        assert_eq!(head.template.as_deref(), Some("main"));
        assert_eq!(
            document,
            vec![Block::Header {
                level: 1,
                text: "A".into()
            }]
        );
    }

    #[test]
    fn test_duplicate_title_fails_before_blocks() {
        assert!(parse("@ One\n@ Two\n# Body").is_err());
    }
}
