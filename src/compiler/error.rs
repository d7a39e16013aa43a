//! Build error taxonomy.

use super::expr::ExpressionError;
use crate::markup::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to parse `{path}`")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("`{page}` uses template `{template}`, which cannot be found")]
    TemplateNotFound { page: String, template: String },

    #[error("template cycle: {}", chain.join(" -> "))]
    TemplateCycle { chain: Vec<String> },

    #[error("cannot resolve import `{path}`")]
    UnresolvedImport { path: String },

    #[error("circular import `{path}`")]
    ImportCycle { path: String },

    #[error("cannot evaluate expression in `{page}`")]
    Expression {
        page: String,
        #[source]
        source: ExpressionError,
    },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Errors that are rendered inline and do not abort the build.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedImport { .. } | Self::ImportCycle { .. })
    }

    /// Inline `<error>` element for a recoverable error.
    pub fn inline_marker(&self) -> Option<String> {
        match self {
            Self::UnresolvedImport { path } => Some(format!("<error>Cannot resolve import {path}</error>")),
            Self::ImportCycle { path } => Some(format!("<error>Circular import {path}</error>")),
            _ => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::head::Directive;

    #[test]
    fn test_recoverable_classification() {
        assert!(BuildError::UnresolvedImport { path: "a".into() }.is_recoverable());
        assert!(BuildError::ImportCycle { path: "a".into() }.is_recoverable());
        assert!(
            !BuildError::TemplateNotFound {
                page: "index.md".into(),
                template: "base".into()
            }
            .is_recoverable()
        );
        assert!(!BuildError::TemplateCycle { chain: vec![] }.is_recoverable());
    }

    #[test]
    fn test_inline_marker() {
        let err = BuildError::UnresolvedImport {
            path: "nav/missing".into(),
        };
        assert_eq!(
            err.inline_marker().as_deref(),
            Some("<error>Cannot resolve import nav/missing</error>")
        );
        let err = BuildError::Parse {
            path: "index.md".into(),
            source: ParseError::DuplicateDirective {
                directive: Directive::Title,
                line: 1,
            },
        };
        assert!(err.inline_marker().is_none());
    }

    #[test]
    fn test_display() {
        let err = BuildError::TemplateCycle {
            chain: vec!["a.md".into(), "b.md".into(), "a.md".into()],
        };
        assert_eq!(err.to_string(), "template cycle: a.md -> b.md -> a.md");
    }
}
