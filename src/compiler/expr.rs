//! Embedded expression evaluation.
//!
//! Integration blocks (`$| ... |$`) run through an [`Evaluator`]. The
//! default one, [`BoaEvaluator`], executes the code as an ECMAScript script
//! in a fresh `boa_engine` context per block, bounded by the limits from
//! `[build.expressions]`. Only the bindings in [`Scope`] are visible:
//!
//! | Binding          | Value                                              |
//! |------------------|----------------------------------------------------|
//! | `Page.title`     | Page title, or the document name without one       |
//! | `<define>`       | Every `@define` of the current document            |
//! | `<prop>`         | Defines of the page rendered through this template |
//! | `getFolder(p)`   | Entries of the components folder at `p`            |
//!
//! If the script's completion value is callable it is called with no
//! arguments. The result is converted with ECMAScript `ToString`:
//!
//! | Result           | Rendered as                     |
//! |------------------|---------------------------------|
//! | `undefined`      | empty string, not `"undefined"` |
//! | anything else    | `String(value)`                 |
//!
//! A variable whose name shadows a read-only global is skipped with a
//! warning.

use super::Page;
use crate::config::ExpressionConfig;
use crate::content::{Entry, Folder, normalize_path};
use crate::log;
use boa_engine::{
    Context, JsError, JsObject, JsResult, JsString, JsValue, NativeFunction, Source, js_string,
    object::{ObjectInitializer, builtins::JsArray},
    property::Attribute,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure raised by embedded code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExpressionError {
    pub message: String,
}

impl ExpressionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// First line of the message, without any stack trace.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl From<JsError> for ExpressionError {
    fn from(err: JsError) -> Self {
        Self::new(err.to_string())
    }
}

/// Runs embedded code against a closed set of bindings.
pub trait Evaluator {
    fn evaluate(&self, code: &str, scope: &Scope<'_>) -> Result<String, ExpressionError>;
}

/// Bindings visible to one integration block.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub title: &'a str,
    pub defines: &'a BTreeMap<String, String>,
    pub props: &'a BTreeMap<String, String>,
    pub entries: &'a EntryIndex,
}

impl Scope<'_> {
    /// Defines merged with props, props taking precedence.
    pub fn variables(&self) -> BTreeMap<&str, &str> {
        self.defines
            .iter()
            .chain(self.props)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }
}

// ============================================================================
// Folder index for `getFolder`
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// One child of a components folder as seen from embedded code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub title: String,
}

/// Children of every components folder, keyed by normalized folder path.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    folders: BTreeMap<String, Vec<FolderEntry>>,
}

impl EntryIndex {
    pub fn from_components(components: &Folder<Page>) -> Self {
        let folders = components
            .folders()
            .into_iter()
            .map(|(prefix, folder)| {
                let entries = folder
                    .children
                    .iter()
                    .map(|(key, entry)| {
                        let path = if prefix.is_empty() {
                            key.clone()
                        } else {
                            format!("{prefix}/{key}")
                        };
                        match entry {
                            Entry::File(page) => FolderEntry {
                                name: page.name.clone(),
                                path,
                                kind: EntryKind::File,
                                title: page.title().to_string(),
                            },
                            Entry::Folder(_) => FolderEntry {
                                name: key.clone(),
                                path,
                                kind: EntryKind::Folder,
                                title: key.clone(),
                            },
                        }
                    })
                    .collect();
                (prefix, entries)
            })
            .collect();

        Self { folders }
    }

    /// Entries under `path`; empty when it is missing or names a file.
    #[cfg(test)]
    pub fn get(&self, path: &str) -> &[FolderEntry] {
        self.folders
            .get(&normalize_path(path))
            .map_or(&[], Vec::as_slice)
    }
}

// ============================================================================
// boa_engine backend
// ============================================================================

/// Evaluator backed by `boa_engine`.
#[derive(Debug, Clone, Default)]
pub struct BoaEvaluator {
    limits: ExpressionConfig,
}

impl BoaEvaluator {
    pub const fn new(limits: ExpressionConfig) -> Self {
        Self { limits }
    }

    fn context(&self) -> Context {
        let mut context = Context::default();
        let limits = context.runtime_limits_mut();
        limits.set_loop_iteration_limit(self.limits.loop_iteration_limit);
        limits.set_recursion_limit(self.limits.recursion_limit);
        limits.set_stack_size_limit(self.limits.stack_size_limit);
        context
    }
}

impl Evaluator for BoaEvaluator {
    fn evaluate(&self, code: &str, scope: &Scope<'_>) -> Result<String, ExpressionError> {
        let mut context = self.context();
        bind(&mut context, scope)?;

        let value = context.eval(Source::from_bytes(code))?;
        let value = match value.as_callable() {
            Some(function) => function.call(&JsValue::undefined(), &[], &mut context)?,
            None => value,
        };

        if value.is_undefined() {
            return Ok(String::new());
        }
        Ok(value.to_string(&mut context)?.to_std_string_escaped())
    }
}

const PAGE_BINDING: &str = "Page";
const GET_FOLDER_BINDING: &str = "getFolder";

fn bind(context: &mut Context, scope: &Scope<'_>) -> JsResult<()> {
    let variables = scope.variables();

    if !variables.contains_key(PAGE_BINDING) {
        let page = ObjectInitializer::new(context)
            .property(js_string!("title"), JsString::from(scope.title), Attribute::all())
            .build();
        context.register_global_property(JsString::from(PAGE_BINDING), page, Attribute::all())?;
    }

    for (name, value) in variables {
        if name == GET_FOLDER_BINDING {
            continue;
        }
        // `undefined`, `NaN` and `Infinity` are read-only globals.
        if let Err(err) =
            context.register_global_property(JsString::from(name), JsString::from(value), Attribute::all())
        {
            log!("warn"; "variable `{name}` not bound: {err}");
        }
    }

    let index = index_object(scope.entries, context)?;
    context.register_global_callable(
        JsString::from(GET_FOLDER_BINDING),
        1,
        NativeFunction::from_copy_closure_with_captures(
            |_this, args, index: &JsObject, context| {
                let path = args.first().cloned().unwrap_or_default();
                let path = normalize_path(&path.to_string(context)?.to_std_string_escaped());
                let entries = index.get(JsString::from(path.as_str()), context)?;
                if entries.is_undefined() {
                    return Ok(JsArray::new(context).into());
                }
                Ok(entries)
            },
            index,
        ),
    )
}

/// Build `{ "<folder path>": [entry, ...] }` with a null prototype.
fn index_object(entries: &EntryIndex, context: &mut Context) -> JsResult<JsObject> {
    let index = JsObject::with_null_proto();
    for (path, children) in &entries.folders {
        let children: Vec<JsValue> = children
            .iter()
            .map(|entry| {
                ObjectInitializer::new(context)
                    .property(js_string!("name"), JsString::from(entry.name.as_str()), Attribute::all())
                    .property(js_string!("path"), JsString::from(entry.path.as_str()), Attribute::all())
                    .property(js_string!("type"), JsString::from(entry.kind.as_str()), Attribute::all())
                    .property(js_string!("title"), JsString::from(entry.title.as_str()), Attribute::all())
                    .build()
                    .into()
            })
            .collect();
        let children = JsArray::from_iter(children, context);
        index.set(JsString::from(path.as_str()), children, false, context)?;
    }
    Ok(index)
}
