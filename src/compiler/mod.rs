//! Document compilation.
//!
//! # Build Flow
//!
//! ```text
//! parse pages ──┐
//!               ├──► pre-render components ──► render pages ──► wrap_page()
//! parse comps ──┘         (BuildContext cache)                      │
//!                                                                   ▼
//!                                                              SiteOutput
//! ```
//!
//! Everything runs on one thread, depth first. A [`BuildContext`] is
//! created per call to [`build`] and dropped with it.

pub mod context;
pub mod error;
pub mod expr;
pub mod html;

pub use context::BuildContext;
pub use error::BuildError;
pub use expr::{BoaEvaluator, Evaluator};

use crate::content::{ContentTree, File, Folder, Named};
use crate::log;
use crate::markup::{self, Document, Head};
use std::collections::BTreeMap;
use std::rc::Rc;

// ============================================================================
// Types
// ============================================================================

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// File name without extension.
    pub name: String,
    /// Canonical path inside its branch, e.g. `blog/first.md`.
    pub path: String,
    pub head: Head,
    pub document: Document,
}

/// A page used as an `@import` target.
pub type Component = Page;

impl Page {
    pub fn parse(file: &File, path: &str) -> Result<Self, BuildError> {
        let (head, document) = markup::parse(&file.text()).map_err(|source| BuildError::Parse {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            name: file.name.clone(),
            path: path.to_string(),
            head,
            document,
        })
    }

    /// `@` title, falling back to the document name.
    pub fn title(&self) -> &str {
        self.head.title.as_deref().unwrap_or(&self.name)
    }
}

impl Named for Page {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A page together with its rendered body.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub page: Page,
    pub content: String,
}

pub type BuiltComponent = BuiltPage;

impl Named for BuiltPage {
    fn name(&self) -> &str {
        &self.page.name
    }
}

/// A final HTML document, written as `{name}.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub name: String,
    pub html: String,
}

/// Everything the output writer needs.
#[derive(Debug)]
pub struct SiteOutput<'t> {
    pub pages: Folder<OutputDocument>,
    pub styles: &'t Folder<File>,
    pub resources: &'t Folder<File>,
}

// ============================================================================
// Build
// ============================================================================

/// Parse every file of a branch.
pub fn parse_branch(folder: &Folder<File>) -> Result<Folder<Page>, BuildError> {
    folder.try_map(&mut |path, file| Page::parse(file, path))
}

/// Compile a loaded project into rendered documents.
///
/// Fails on the first fatal error. Missing imports and import cycles are
/// rendered inline instead.
pub fn build<'t>(tree: &'t ContentTree, evaluator: &dyn Evaluator) -> Result<SiteOutput<'t>, BuildError> {
    let pages = parse_branch(&tree.pages)?;
    let components = parse_branch(&tree.components)?;

    let mut ctx = BuildContext::new(tree, &components, evaluator);

    for (path, _) in components.files() {
        ctx.component(&path)?;
    }
    log!("build"; "rendered {} components", ctx.cached());

    let no_props = BTreeMap::new();
    let built = pages.try_map(&mut |_, page| {
        ctx.render_page(page, &no_props).map(|content| BuiltPage {
            page: page.clone(),
            content,
        })
    })?;

    let wrapping = &tree.config.build.components;
    let prefix = wrapper(&mut ctx, wrapping.prefix.as_deref())?;
    let suffix = wrapper(&mut ctx, wrapping.suffix.as_deref())?;

    let site = &tree.config.site;
    let pages = built.try_map(&mut |_, page| {
        Ok::<_, BuildError>(OutputDocument {
            name: page.page.name.clone(),
            html: html::wrap_page(page, site, prefix.as_deref(), suffix.as_deref()),
        })
    })?;

    Ok(SiteOutput {
        pages,
        styles: &tree.styles,
        resources: &tree.resources,
    })
}

/// Resolve a `[build.components]` prefix or suffix.
fn wrapper(ctx: &mut BuildContext<'_>, path: Option<&str>) -> Result<Option<Rc<BuiltComponent>>, BuildError> {
    let Some(path) = path else {
        return Ok(None);
    };
    match ctx.component(path) {
        Ok(component) => Ok(Some(component)),
        Err(err) if err.is_recoverable() => {
            log!("warn"; "page wrapper skipped: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::Entry;
    use crate::content::tests::put;

    fn project(pages: &[(&str, &str)], components: &[(&str, &str)]) -> ContentTree {
        let mut tree = ContentTree::new(SiteConfig::default());
        for (path, content) in pages {
            put(&mut tree.pages, path, content);
        }
        for (path, content) in components {
            put(&mut tree.components, path, content);
        }
        tree
    }

    fn page_html<'a>(output: &'a SiteOutput<'_>, key: &str) -> &'a str {
        match output.pages.children.get(key) {
            Some(Entry::File(doc)) => &doc.html,
            other => panic!("no page at {key}: {other:?}"),
        }
    }

    #[test]
    fn test_build_mirrors_page_tree() {
        let tree = project(
            &[("index.md", "@ Home\n# Hi"), ("blog/first.md", "post")],
            &[],
        );
        let output = build(&tree, &BoaEvaluator::default()).unwrap();

        assert!(page_html(&output, "index.md").contains("<h1 class=\"header h-1\">Hi</h1>"));
        let Some(Entry::Folder(blog)) = output.pages.children.get("blog") else {
            panic!("blog folder missing");
        };
        assert!(matches!(blog.children.get("first.md"), Some(Entry::File(doc)) if doc.name == "first"));
    }

    #[test]
    fn test_prefix_and_suffix_wrap_every_page() {
        let mut tree = project(
            &[("index.md", "body")],
            &[("header.md", "@ Top\nHEAD"), ("footer.md", "FOOT")],
        );
        tree.config.build.components.prefix = Some("header".into());
        tree.config.build.components.suffix = Some("footer".into());
        let output = build(&tree, &BoaEvaluator::default()).unwrap();
        let html = page_html(&output, "index.md");

        let head = html.find("component-Top").unwrap();
        let body = html.find("body</p>").unwrap();
        let foot = html.find("component-footer").unwrap();
        assert!(head < body && body < foot);
    }

    #[test]
    fn test_missing_wrapper_is_skipped() {
        let mut tree = project(&[("index.md", "body")], &[]);
        tree.config.build.components.prefix = Some("nope".into());
        let output = build(&tree, &BoaEvaluator::default()).unwrap();
        assert!(!page_html(&output, "index.md").contains("component-"));
    }

    #[test]
    fn test_duplicate_title_aborts_build() {
        let tree = project(&[("index.md", "@ One\n@ Two\nx")], &[]);
        let err = build(&tree, &BoaEvaluator::default()).unwrap_err();
        assert!(matches!(err, BuildError::Parse { ref path, .. } if path == "index.md"));
    }

    #[test]
    fn test_broken_component_aborts_build() {
        let tree = project(&[("index.md", "x")], &[("nav.md", "@be missing")]);
        let err = build(&tree, &BoaEvaluator::default()).unwrap_err();
        assert!(matches!(err, BuildError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_page_title_in_document() {
        let mut tree = project(&[("index.md", "@ Home\nx"), ("about.md", "y")], &[]);
        tree.config.site.title = "%page_name% | Site".into();
        let output = build(&tree, &BoaEvaluator::default()).unwrap();
        assert!(page_html(&output, "index.md").contains("<title>Home | Site</title>"));
        assert!(page_html(&output, "about.md").contains("<title> | Site</title>"));
    }

    #[test]
    fn test_components_render_once_per_build() {
        let tree = project(
            &[("a.md", "@import nav"), ("b.md", "@import nav\n@import nav")],
            &[("nav.md", "$| Math.random() |$")],
        );
        let output = build(&tree, &BoaEvaluator::default()).unwrap();

        let extract = |html: &str| {
            let start = html.find("component-nav").unwrap();
            let end = start + html[start..].find("</div>").unwrap();
            html[start..end].to_string()
        };
        assert_eq!(
            extract(page_html(&output, "a.md")),
            extract(page_html(&output, "b.md"))
        );
    }
}
