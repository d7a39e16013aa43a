//! HTML wrappers for components and full page documents.

use super::{BuiltComponent, BuiltPage};
use crate::config::SiteSection;
use std::fmt::Write;

/// Stylesheet every page links first.
pub const INDEX_STYLESHEET: &str = "/styles/index.css";

/// `<link>` to a stylesheet under `/styles/`.
pub fn stylesheet_link(css: &str) -> String {
    format!(
        r#"<link rel="stylesheet" href="/styles/{}" />"#,
        css.trim_start_matches('/')
    )
}

/// Wrap rendered component content in its container element.
///
/// The container class carries the component title (or name), and the
/// component's own stylesheets are linked right inside it.
pub fn wrap_component(component: &BuiltComponent) -> String {
    let mut html = format!(
        r#"<div class="component component-{}">"#,
        component.page.title()
    );
    html.push('\n');
    for css in &component.page.head.css {
        html.push_str(&stylesheet_link(css));
        html.push('\n');
    }
    html.push_str(&component.content);
    html.push_str("\n</div>\n");
    html
}

/// Assemble the final HTML document for a page.
pub fn wrap_page(
    page: &BuiltPage,
    site: &SiteSection,
    prefix: Option<&BuiltComponent>,
    suffix: Option<&BuiltComponent>,
) -> String {
    let title = site.page_title(page.page.head.title.as_deref());

    let mut head = String::new();
    head.push_str("  <meta charset=\"UTF-8\">\n");
    head.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(head, "  <title>{title}</title>");
    if let Some(favicon) = &site.favicon {
        let _ = writeln!(head, r#"  <link rel="icon" type="image/x-icon" href="{favicon}">"#);
    }
    let _ = writeln!(head, r#"  <link rel="stylesheet" href="{INDEX_STYLESHEET}" />"#);
    for css in &page.page.head.css {
        let _ = writeln!(head, "  {}", stylesheet_link(css));
    }

    let mut body = String::new();
    if let Some(prefix) = prefix {
        body.push_str(&wrap_component(prefix));
    }
    body.push_str(&page.content);
    if let Some(suffix) = suffix {
        body.push_str(&wrap_component(suffix));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n{head}</head>\n<body>\n{body}</body>\n</html>\n",
        lang = site.language,
    )
}
