//! Per-build render state.
//!
//! A [`BuildContext`] lives for exactly one build. It owns the component
//! cache (canonical path → rendered component) and the stacks used to
//! detect import and template cycles.

use super::expr::{EntryIndex, Evaluator, Scope};
use super::{BuildError, BuiltComponent, BuiltPage, Component, Page, html};
use crate::content::{ContentTree, File, Folder};
use crate::log;
use crate::markup::{Block, inline};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::rc::Rc;

/// Class used for code blocks without a language tag.
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

pub struct BuildContext<'a> {
    templates: &'a Folder<File>,
    components: &'a Folder<Component>,
    evaluator: &'a dyn Evaluator,
    strict_expressions: bool,
    entries: EntryIndex,
    cache: FxHashMap<String, Rc<BuiltComponent>>,
    /// Components currently being rendered, outermost first.
    importing: Vec<String>,
    /// Templates currently being rendered, outermost first.
    templating: Vec<String>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        tree: &'a ContentTree,
        components: &'a Folder<Component>,
        evaluator: &'a dyn Evaluator,
    ) -> Self {
        Self {
            templates: &tree.templates,
            components,
            evaluator,
            strict_expressions: tree.config.build.strict_expressions,
            entries: EntryIndex::from_components(components),
            cache: FxHashMap::default(),
            importing: Vec::new(),
            templating: Vec::new(),
        }
    }

    /// Number of components rendered so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolve and render a component, at most once per build.
    pub fn component(&mut self, path: &str) -> Result<Rc<BuiltComponent>, BuildError> {
        let components = self.components;
        let Some((key, component)) = components.resolve_file(path) else {
            return Err(BuildError::UnresolvedImport {
                path: path.to_string(),
            });
        };

        if let Some(built) = self.cache.get(&key) {
            return Ok(Rc::clone(built));
        }
        if self.importing.contains(&key) {
            return Err(BuildError::ImportCycle {
                path: path.to_string(),
            });
        }

        self.importing.push(key.clone());
        let content = self.render_page(component, &BTreeMap::new());
        self.importing.pop();

        let built = Rc::new(BuiltPage {
            page: component.clone(),
            content: content?,
        });
        self.cache.insert(key, Rc::clone(&built));
        Ok(built)
    }

    /// Render a page body.
    ///
    /// A page declaring `@be` renders as its template, which receives the
    /// page's defines as `props`. The page's own blocks are discarded then.
    pub fn render_page(
        &mut self,
        page: &Page,
        props: &BTreeMap<String, String>,
    ) -> Result<String, BuildError> {
        if let Some(template) = &page.head.template {
            return self.render_template(page, template);
        }

        let mut out = String::new();
        for block in &page.document {
            self.render_block(page, props, block, &mut out)?;
        }
        Ok(out)
    }

    fn render_template(&mut self, page: &Page, template: &str) -> Result<String, BuildError> {
        let templates = self.templates;
        let Some((key, file)) = templates.resolve_file(template) else {
            return Err(BuildError::TemplateNotFound {
                page: page.path.clone(),
                template: template.to_string(),
            });
        };

        if self.templating.contains(&key) {
            let mut chain = self.templating.clone();
            chain.push(key);
            return Err(BuildError::TemplateCycle { chain });
        }

        let template = Page::parse(file, &key)?;
        self.templating.push(key);
        let content = self.render_page(&template, &page.head.defines);
        self.templating.pop();
        content
    }

    fn render_block(
        &mut self,
        page: &Page,
        props: &BTreeMap<String, String>,
        block: &Block,
        out: &mut String,
    ) -> Result<(), BuildError> {
        match block {
            Block::Header { level, text } => {
                let _ = writeln!(out, r#"<h{level} class="header h-{level}">{text}</h{level}>"#);
            }
            Block::Paragraph { lines } => {
                let _ = writeln!(out, r#"<p class="paragraph">{}</p>"#, inline::substitute(&lines.join("\n")));
            }
            Block::BlockQuote { lines } => {
                let _ = writeln!(out, r#"<p class="block-quotes">{}</p>"#, inline::substitute(&lines.join("\n")));
            }
            Block::UnorderedList { lines } => {
                let _ = writeln!(out, r#"<ul class="ul">{}</ul>"#, list_items(lines));
            }
            Block::OrderedList { lines } => {
                let _ = writeln!(out, r#"<ol class="ol">{}</ol>"#, list_items(lines));
            }
            Block::Separator => out.push_str("<span class=\"separator\"></span>\n"),
            Block::CodeBlock { language, lines } => {
                let language = language.as_deref().unwrap_or(DEFAULT_CODE_LANGUAGE);
                let _ = writeln!(
                    out,
                    r#"<pre class="codeblock"><code class="lang-{language}">{}</code></pre>"#,
                    lines.join("\n")
                );
            }
            Block::Import { path } => match self.component(path) {
                Ok(component) => out.push_str(&html::wrap_component(&component)),
                Err(err) => match err.inline_marker() {
                    Some(marker) => {
                        log!("warn"; "{}: {err}", page.path);
                        out.push_str(&marker);
                    }
                    None => return Err(err),
                },
            },
            Block::Integration { code, .. } => {
                let scope = Scope {
                    title: page.title(),
                    defines: &page.head.defines,
                    props,
                    entries: &self.entries,
                };
                match self.evaluator.evaluate(code, &scope) {
                    Ok(text) => out.push_str(&text),
                    Err(source) if self.strict_expressions => {
                        return Err(BuildError::Expression {
                            page: page.path.clone(),
                            source,
                        });
                    }
                    Err(err) => {
                        let message = err.summary();
                        log!("warn"; "{}: cannot evaluate expression: {message}", page.path);
                        let _ = write!(
                            out,
                            "<error>Cannot evaluate expression: {}</error>",
                            escape_html(message)
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn list_items(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!(r#"<li class="li">{}</li>"#, inline::substitute(line)))
        .collect()
}
