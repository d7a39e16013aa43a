//! Inline text substitution.
//!
//! Applied to paragraph, list and quote text only. The passes run in a fixed
//! order, each on the output of the previous one:
//!
//! 1. `![alt](path)` → `<img>` rooted under `/resources/`
//! 2. `[text](path)` → `<a>`, with `.md` targets rewritten to `.html`
//! 3. `**bold**` → `<b>`
//! 4. `*italic*` → `<i>`
//! 5. `` `code` `` → `<code>`

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Extension of source documents.
pub const MARKUP_EXTENSION: &str = "md";
/// Extension of rendered documents.
pub const OUTPUT_EXTENSION: &str = "html";
/// URL prefix of the copied resources tree.
pub const RESOURCES_URL: &str = "/resources";

static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());
// The optional `!` is matched so images can be skipped, the crate has no look-behind.
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\(([^)]*)\)").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Run every inline pass over `input`.
pub fn substitute(input: &str) -> String {
    let text = IMAGE.replace_all(input, |caps: &Captures<'_>| {
        let alt = &caps[1];
        let path = caps[2].trim_start_matches('/');
        format!(r#"<img alt="{alt}" src="{RESOURCES_URL}/{path}" class="image image-{alt}" />"#)
    });
    let text = LINK.replace_all(&text, |caps: &Captures<'_>| {
        if caps[0].starts_with('!') {
            return caps[0].to_string();
        }
        format!(r#"<a href="{}">{}</a>"#, link_target(&caps[2]), &caps[1])
    });
    let text = BOLD.replace_all(&text, "<b>$1</b>");
    let text = ITALIC.replace_all(&text, "<i>$1</i>");
    let text = CODE.replace_all(&text, "<code>$1</code>");
    text.into_owned()
}

/// Rewrite links to source documents so they point at rendered pages.
pub fn link_target(path: &str) -> String {
    let markup_suffix = format!(".{MARKUP_EXTENSION}");
    match path.strip_suffix(&markup_suffix) {
        Some(stem) => format!("{stem}.{OUTPUT_EXTENSION}"),
        None => path.to_string(),
    }
}
