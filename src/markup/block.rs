//! Block assembly.
//!
//! Folds the [`LineToken`] stream into a [`Document`]. Text-like tokens of
//! the same kind accumulate into one block until a blank line or a token of a
//! different kind closes the accumulation. Code blocks follow fence
//! boundaries and integration blocks follow their `closed` flag instead.

use super::lexer::LineToken;

/// One semantic unit of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header { level: usize, text: String },
    Paragraph { lines: Vec<String> },
    UnorderedList { lines: Vec<String> },
    OrderedList { lines: Vec<String> },
    BlockQuote { lines: Vec<String> },
    Separator,
    CodeBlock { language: Option<String>, lines: Vec<String> },
    Import { path: String },
    Integration { code: String, closed: bool },
}

pub type Document = Vec<Block>;

/// Accumulating block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Paragraph,
    Unordered,
    Ordered,
    Quote,
}

impl TextKind {
    fn of(block: &Block) -> Option<Self> {
        match block {
            Block::Paragraph { .. } => Some(Self::Paragraph),
            Block::UnorderedList { .. } => Some(Self::Unordered),
            Block::OrderedList { .. } => Some(Self::Ordered),
            Block::BlockQuote { .. } => Some(Self::Quote),
            _ => None,
        }
    }

    fn start(self, line: &str) -> Block {
        let lines = vec![line.to_string()];
        match self {
            Self::Paragraph => Block::Paragraph { lines },
            Self::Unordered => Block::UnorderedList { lines },
            Self::Ordered => Block::OrderedList { lines },
            Self::Quote => Block::BlockQuote { lines },
        }
    }
}

fn text_lines_mut(block: &mut Block) -> Option<&mut Vec<String>> {
    match block {
        Block::Paragraph { lines }
        | Block::UnorderedList { lines }
        | Block::OrderedList { lines }
        | Block::BlockQuote { lines } => Some(lines),
        _ => None,
    }
}

#[derive(Default)]
struct Assembler {
    blocks: Document,
    /// Whether the last block still accepts text lines of its kind.
    open: bool,
}

impl Assembler {
    fn push(&mut self, block: Block) {
        self.blocks.push(block);
        self.open = false;
    }

    fn text(&mut self, kind: TextKind, line: &str) {
        if self.open {
            if let Some(last) = self.blocks.last_mut() {
                if TextKind::of(last) == Some(kind) {
                    if let Some(lines) = text_lines_mut(last) {
                        lines.push(line.to_string());
                        return;
                    }
                }
            }
        }
        self.blocks.push(kind.start(line));
        self.open = true;
    }

    fn code_line(&mut self, line: &str) {
        if let Some(Block::CodeBlock { lines, .. }) = self.blocks.last_mut() {
            lines.push(line.to_string());
        }
    }

    fn integration(&mut self, fragment: &str, is_closed: bool) {
        self.open = false;
        if let Some(Block::Integration { code, closed }) = self.blocks.last_mut() {
            if !*closed {
                code.push('\n');
                code.push_str(fragment);
                *closed = is_closed;
                return;
            }
        }
        self.blocks.push(Block::Integration {
            code: fragment.to_string(),
            closed: is_closed,
        });
    }

    fn feed(&mut self, token: LineToken<'_>) {
        match token {
            LineToken::Blank => self.open = false,
            LineToken::Separator => self.push(Block::Separator),
            LineToken::Header { level, text } => self.push(Block::Header {
                level,
                text: text.to_string(),
            }),
            LineToken::Import(path) => self.push(Block::Import {
                path: path.to_string(),
            }),
            LineToken::FenceOpen { language } => self.push(Block::CodeBlock {
                language: language.map(str::to_string),
                lines: Vec::new(),
            }),
            LineToken::CodeLine(line) => self.code_line(line),
            LineToken::FenceClose => self.open = false,
            LineToken::Text(line) => self.text(TextKind::Paragraph, line),
            LineToken::UnorderedItem(line) => self.text(TextKind::Unordered, line),
            LineToken::OrderedItem(line) => self.text(TextKind::Ordered, line),
            LineToken::Quote(line) => self.text(TextKind::Quote, line),
            LineToken::Integration { code, closed } => self.integration(code, closed),
        }
    }
}

/// Reduce a token stream to a document.
pub fn assemble<'a>(tokens: impl IntoIterator<Item = LineToken<'a>>) -> Document {
    let mut assembler = Assembler::default();
    for token in tokens {
        assembler.feed(token);
    }
    assembler.blocks
}
