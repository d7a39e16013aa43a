//! Line classification.
//!
//! Turns the body lines of a document into [`LineToken`]s. The scan is a
//! forward pass with two modes that swallow lines verbatim:
//!
//! - **fence**: opened by a line starting with ```` ``` ````, closed by a line
//!   that is exactly ```` ``` ````.
//! - **integration**: opened by `$|` without a closing `|$` on the same line,
//!   closed by the next line containing `|$`.
//!
//! Outside those modes, classification order is: blank, separator, fence
//! open, header, import, unordered item, ordered item, quote, integration,
//! paragraph text.

use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+(.*)$").unwrap());
static IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@import\s+(.+)$").unwrap());
static UNORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+*]\s*").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s*").unwrap());

pub const FENCE: &str = "```";
pub const SEPARATOR: &str = "---";
pub const INTEGRATION_OPEN: &str = "$|";
pub const INTEGRATION_CLOSE: &str = "|$";

/// One classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineToken<'a> {
    Blank,
    Separator,
    FenceOpen { language: Option<&'a str> },
    /// A raw line inside a fence.
    CodeLine(&'a str),
    FenceClose,
    Header { level: usize, text: &'a str },
    Import(&'a str),
    UnorderedItem(&'a str),
    OrderedItem(&'a str),
    Quote(&'a str),
    /// A fragment of embedded code. `closed` is set once `|$` was seen.
    Integration { code: &'a str, closed: bool },
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Fence,
    Integration,
}

/// Iterator adapter classifying lines one at a time.
pub struct Lexer<I> {
    lines: I,
    mode: Mode,
}

impl<'a, I> Lexer<I>
where
    I: Iterator<Item = &'a str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            mode: Mode::Normal,
        }
    }

    fn fence_line(&mut self, line: &'a str) -> LineToken<'a> {
        if line.trim() == FENCE {
            self.mode = Mode::Normal;
            LineToken::FenceClose
        } else {
            LineToken::CodeLine(line)
        }
    }

    fn integration_line(&mut self, line: &'a str) -> LineToken<'a> {
        match line.find(INTEGRATION_CLOSE) {
            Some(end) => {
                self.mode = Mode::Normal;
                LineToken::Integration {
                    code: &line[..end],
                    closed: true,
                }
            }
            None => LineToken::Integration {
                code: line,
                closed: false,
            },
        }
    }

    fn normal_line(&mut self, line: &'a str) -> LineToken<'a> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return LineToken::Blank;
        }
        if trimmed == SEPARATOR {
            return LineToken::Separator;
        }
        if let Some(tag) = trimmed.strip_prefix(FENCE) {
            self.mode = Mode::Fence;
            let language = tag.split(FENCE).next().map(str::trim).filter(|t| !t.is_empty());
            return LineToken::FenceOpen { language };
        }
        if let Some(caps) = HEADER.captures(trimmed) {
            let (Some(hashes), Some(text)) = (caps.get(1), caps.get(2)) else {
                return LineToken::Text(line.trim_end());
            };
            return LineToken::Header {
                level: hashes.len(),
                text: text.as_str(),
            };
        }
        if let Some(caps) = IMPORT.captures(trimmed) {
            if let Some(path) = caps.get(1) {
                return LineToken::Import(path.as_str().trim());
            }
        }
        if let Some(rest) = strip_marker(&UNORDERED, trimmed) {
            return LineToken::UnorderedItem(rest);
        }
        if let Some(rest) = strip_marker(&ORDERED, trimmed) {
            return LineToken::OrderedItem(rest);
        }
        if let Some(rest) = strip_marker(&QUOTE, trimmed) {
            return LineToken::Quote(rest);
        }
        if let Some(start) = line.find(INTEGRATION_OPEN) {
            let after = &line[start + INTEGRATION_OPEN.len()..];
            return match after.find(INTEGRATION_CLOSE) {
                Some(end) => LineToken::Integration {
                    code: &after[..end],
                    closed: true,
                },
                None => {
                    self.mode = Mode::Integration;
                    LineToken::Integration {
                        code: after,
                        closed: false,
                    }
                }
            };
        }

        LineToken::Text(line.trim_end())
    }
}

impl<'a, I> Iterator for Lexer<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = LineToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(match self.mode {
            Mode::Fence => self.fence_line(line),
            Mode::Integration => self.integration_line(line),
            Mode::Normal => self.normal_line(line),
        })
    }
}

/// Classify every line of `lines`.
#[cfg(test)]
pub fn tokenize<'a>(lines: &[&'a str]) -> Vec<LineToken<'a>> {
    Lexer::new(lines.iter().copied()).collect()
}

/// Strip a leading list or quote marker (plus following whitespace).
fn strip_marker<'a>(marker: &Regex, trimmed: &'a str) -> Option<&'a str> {
    marker.find(trimmed).map(|m| &trimmed[m.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_classification() {
        let tokens = tokenize(&["", "---", "## Title", "@import nav/header", "plain  "]);
        assert_eq!(
            tokens,
            vec![
                LineToken::Blank,
                LineToken::Separator,
                LineToken::Header {
                    level: 2,
                    text: "Title"
                },
                LineToken::Import("nav/header"),
                LineToken::Text("plain"),
            ]
        );
    }

    #[test]
    fn test_header_levels() {
        for level in 1..=7 {
            let line = format!("{} Heading", "#".repeat(level));
            let tokens = tokenize(&[line.as_str()]);
            assert_eq!(
                tokens,
                vec![LineToken::Header {
                    level,
                    text: "Heading"
                }]
            );
        }
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(tokenize(&["#hashtag"]), vec![LineToken::Text("#hashtag")]);
    }

    #[test]
    fn test_unordered_markers_are_interchangeable() {
        let tokens = tokenize(&["- one", "*   two", "+three", "-  keep  inner  "]);
        assert_eq!(
            tokens,
            vec![
                LineToken::UnorderedItem("one"),
                LineToken::UnorderedItem("two"),
                LineToken::UnorderedItem("three"),
                LineToken::UnorderedItem("keep  inner"),
            ]
        );
    }

    #[test]
    fn test_ordered_and_quote() {
        let tokens = tokenize(&["1. first", "42.answer", "> quoted", ">tight"]);
        assert_eq!(
            tokens,
            vec![
                LineToken::OrderedItem("first"),
                LineToken::OrderedItem("answer"),
                LineToken::Quote("quoted"),
                LineToken::Quote("tight"),
            ]
        );
    }

    #[test]
    fn test_paragraph_keeps_leading_whitespace() {
        assert_eq!(tokenize(&["  indented  "]), vec![LineToken::Text("  indented")]);
    }

    #[test]
    fn test_fence_mode_is_verbatim() {
        let tokens = tokenize(&["```rust", "# not a header", "**x**", "  ```  ", "# header"]);
        assert_eq!(
            tokens,
            vec![
                LineToken::FenceOpen {
                    language: Some("rust")
                },
                LineToken::CodeLine("# not a header"),
                LineToken::CodeLine("**x**"),
                LineToken::FenceClose,
                LineToken::Header {
                    level: 1,
                    text: "header"
                },
            ]
        );
    }

    #[test]
    fn test_fence_without_language() {
        assert_eq!(
            tokenize(&["```"]),
            vec![LineToken::FenceOpen { language: None }]
        );
    }

    #[test]
    fn test_nested_fence_tag_is_a_code_line() {
        let tokens = tokenize(&["```", "```js", "```"]);
        assert_eq!(tokens[1], LineToken::CodeLine("```js"));
        assert_eq!(tokens[2], LineToken::FenceClose);
    }

    #[test]
    fn test_self_closed_integration() {
        assert_eq!(
            tokenize(&["before $| 1 + 1 |$ after"]),
            vec![LineToken::Integration {
                code: " 1 + 1 ",
                closed: true
            }]
        );
    }

    #[test]
    fn test_multiline_integration() {
        let tokens = tokenize(&["$| const a = 1;", "# raw", "", "a |$ dropped", "# header"]);
        assert_eq!(
            tokens,
            vec![
                LineToken::Integration {
                    code: " const a = 1;",
                    closed: false
                },
                LineToken::Integration {
                    code: "# raw",
                    closed: false
                },
                LineToken::Integration {
                    code: "",
                    closed: false
                },
                LineToken::Integration {
                    code: "a ",
                    closed: true
                },
                LineToken::Header {
                    level: 1,
                    text: "header"
                },
            ]
        );
    }

    #[test]
    fn test_list_wins_over_integration() {
        assert_eq!(
            tokenize(&["- $| 1 |$"]),
            vec![LineToken::UnorderedItem("$| 1 |$")]
        );
    }
}
