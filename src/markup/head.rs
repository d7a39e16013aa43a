//! Front matter extraction.
//!
//! A document may open with a contiguous run of `@` directives:
//!
//! ```text
//! @ Home                  title
//! @use site.css           stylesheet, may repeat
//! @be layouts/main        template reference
//! @define author Alice    variable passed to templates and expressions
//! ```
//!
//! The first line that is not a directive ends the run, even a blank one.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static USE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@use\s+(.+)$").unwrap());
static BE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@be\s+(.+)$").unwrap());
static DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@define\s+(\S+)(?:\s+(.*))?$").unwrap());
static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@\s+(.+)$").unwrap());

/// Metadata collected from a document's front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    pub title: Option<String>,
    /// Stylesheets in declaration order.
    pub css: Vec<String>,
    /// Template path from `@be`.
    pub template: Option<String>,
    pub defines: BTreeMap<String, String>,
}

/// Directives that may appear at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Title,
    Template,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("@"),
            Self::Template => f.write_str("@be"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("`{directive}` directive set twice (line {line})")]
    DuplicateDirective { directive: Directive, line: usize },
}

/// Split the front matter off `lines`.
///
/// Returns the parsed [`Head`] and the remaining lines, starting with the
/// first line that matched no directive.
pub fn extract_head<'a, 'l>(lines: &'l [&'a str]) -> Result<(Head, &'l [&'a str]), ParseError> {
    let mut head = Head::default();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some(caps) = USE.captures(trimmed) {
            head.css.push(caps[1].to_string());
        } else if let Some(caps) = BE.captures(trimmed) {
            set_once(&mut head.template, &caps[1], Directive::Template, index)?;
        } else if let Some(caps) = DEFINE.captures(trimmed) {
            let value = caps.get(2).map_or("", |m| m.as_str());
            head.defines.insert(caps[1].to_string(), value.to_string());
        } else if let Some(caps) = TITLE.captures(trimmed) {
            set_once(&mut head.title, &caps[1], Directive::Title, index)?;
        } else {
            return Ok((head, &lines[index..]));
        }
    }

    Ok((head, &[]))
}

fn set_once(
    slot: &mut Option<String>,
    value: &str,
    directive: Directive,
    index: usize,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateDirective {
            directive,
            line: index + 1,
        });
    }
    *slot = Some(value.to_string());
    Ok(())
}
