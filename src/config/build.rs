//! `[build]` section configuration.
//!
//! Contains output, template, component wrapping and expression settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in marksite.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// out_dir = "dist"          # Output directory (also accepted as `outDir`)
/// templates = "templates"   # Branch holding `@be` targets
/// minify = true
///
/// [build.components]
/// prefix = "header"
/// suffix = "footer"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Build output directory, relative to the project root.
    #[serde(default = "defaults::build::out_dir", alias = "outDir")]
    #[educe(Default = defaults::build::out_dir())]
    pub out_dir: PathBuf,

    /// Directory holding templates. Point it at `components` to share one
    /// branch between imports and templates.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Minify HTML output.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Abort the build when an embedded expression fails instead of
    /// rendering an inline error.
    #[serde(default = "defaults::r#false", alias = "strictExpressions")]
    #[educe(Default = false)]
    pub strict_expressions: bool,

    /// Components wrapped around every page.
    #[serde(default)]
    pub components: ComponentsConfig,

    /// Embedded expression limits.
    #[serde(default)]
    pub expressions: ExpressionConfig,
}

/// `[build.components]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentsConfig {
    /// Component path rendered before every page's content.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Component path rendered after every page's content.
    #[serde(default)]
    pub suffix: Option<String>,
}

/// `[build.expressions]` section - execution bounds for `$| ... |$` code.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ExpressionConfig {
    #[serde(default = "defaults::build::expressions::loop_iteration_limit")]
    #[educe(Default = defaults::build::expressions::loop_iteration_limit())]
    pub loop_iteration_limit: u64,

    #[serde(default = "defaults::build::expressions::recursion_limit")]
    #[educe(Default = defaults::build::expressions::recursion_limit())]
    pub recursion_limit: usize,

    #[serde(default = "defaults::build::expressions::stack_size_limit")]
    #[educe(Default = defaults::build::expressions::stack_size_limit())]
    pub stack_size_limit: usize,
}
