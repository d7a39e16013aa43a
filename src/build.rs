//! Site building orchestration.
//!
//! ```text
//! build_site()
//!     │
//!     ├── load_project()   read pages, components, templates, styles, resources
//!     ├── output::clean    delete the previous output directory
//!     ├── compiler::build  parse, render components once, render pages
//!     └── write_site()     write pages, copy styles and resources
//! ```
//!
//! The output directory is deleted before writing, so two builds must never
//! target the same directory at once.

use crate::{
    compiler::{self, BoaEvaluator},
    config::SiteConfig,
    content::load_project,
    log,
    output,
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub files: usize,
    pub out_dir: PathBuf,
}

/// Build the site described by `config` into its output directory.
pub fn build_site(config: &SiteConfig) -> Result<BuildSummary> {
    let out_dir = config.output_dir();
    let evaluator = BoaEvaluator::new(config.build.expressions.clone());

    let tree = load_project(config.clone())
        .with_context(|| format!("Failed to load project at {}", config.get_root().display()))?;
    log!(
        "build";
        "loaded {} pages, {} components, {} templates",
        tree.pages.file_count(),
        tree.components.file_count(),
        tree.templates.file_count()
    );
    if tree.pages.is_empty() {
        log!("warn"; "no pages found, the site will be empty");
    }

    output::clean(&out_dir)?;
    let site = compiler::build(&tree, &evaluator).context("Build failed")?;
    let files = output::write_site(&site, &out_dir, config.build.minify)?;

    let pages = site.pages.file_count();
    log!("done"; "{} pages, {} files written to {}", pages, files, out_dir.display());

    Ok(BuildSummary {
        pages,
        files,
        out_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_for(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config
    }

    #[test]
    fn test_build_site_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "pages/index.md", "@ Home\n@use site.css\n\n# Welcome\n\nHello **world**!\n@import nav\n");
        write(root, "pages/blog/post.md", "@be post\n@define author Alice\n");
        write(root, "components/nav.md", "@ Nav\n- [Post](blog/post.md)\n");
        write(root, "templates/post.md", "# Post\n$| 'by ' + author |$\n");
        write(root, "styles/site.css", "h1{}");
        write(root, "resources/logo.png", "png");

        let summary = build_site(&config_for(root)).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.files, 4);

        let index = fs::read_to_string(root.join("dist/index.html")).unwrap();
        assert!(index.contains("<title>Home</title>"));
        assert!(index.contains(r#"<link rel="stylesheet" href="/styles/site.css" />"#));
        assert!(index.contains("<h1 class=\"header h-1\">Welcome</h1>"));
        assert!(index.contains("<p class=\"paragraph\">Hello <b>world</b>!</p>"));
        assert!(index.contains(r#"<a href="blog/post.html">Post</a>"#));

        let post = fs::read_to_string(root.join("dist/blog/post.html")).unwrap();
        assert!(post.contains("<h1 class=\"header h-1\">Post</h1>"));
        assert!(post.contains("by Alice"));

        assert!(root.join("dist/styles/site.css").is_file());
        assert!(root.join("dist/resources/logo.png").is_file());
    }

    #[test]
    fn test_build_replaces_previous_output() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "pages/index.md", "hi");
        write(root, "dist/stale.html", "old");

        build_site(&config_for(root)).unwrap();
        assert!(!root.join("dist/stale.html").exists());
        assert!(root.join("dist/index.html").is_file());
    }

    #[test]
    fn test_project_without_pages_builds_empty_site() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "components/nav.md", "nav");

        let summary = build_site(&config_for(root)).unwrap();
        assert_eq!(summary.pages, 0);
        assert!(root.join("dist").is_dir());
        assert!(!root.join("dist/nav.html").exists());
    }

    #[test]
    fn test_fatal_error_fails_build() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "pages/index.md", "@be missing\n");
        write(root, "dist/index.html", "old");

        let err = build_site(&config_for(root)).unwrap_err();
        assert!(format!("{err:#}").contains("missing"));
        assert!(!root.join("dist/index.html").exists());
    }
}
