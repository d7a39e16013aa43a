//! Site configuration management for `marksite.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[site]`    | Document title pattern, favicon, language          |
//! | `[build]`   | Output dir, templates branch, wrapping, expressions |
//! | `[server]`  | Preview server (interface, port)                   |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "%page_name% | My Site"
//!
//! [build]
//! out_dir = "dist"
//!
//! [build.components]
//! prefix = "header"
//!
//! [server]
//! port = 5277
//! ```
//!
//! A config path ending in `.json` is read as JSON with the same shape.

mod build;
pub mod defaults;
mod error;
mod server;
mod site;

pub use build::{BuildConfig, ExpressionConfig};
pub use error::ConfigError;
pub use server::ServerConfig;
pub use site::SiteSection;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "marksite.toml";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing marksite.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Project root directory (set after loading)
    #[serde(skip)]
    pub root: Option<PathBuf>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Document head settings
    #[serde(default)]
    pub site: SiteSection,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path, choosing the format by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_str(&content)?,
        };
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = Some(path.to_path_buf())
    }

    /// Absolute output directory
    pub fn output_dir(&self) -> PathBuf {
        self.get_root().join(&self.build.out_dir)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let args = cli.build_args();
        let root = args.path.clone().unwrap_or_else(|| self.get_root().to_owned());
        self.set_root(&Self::normalize_path(&root));

        Self::update_option(&mut self.build.out_dir, args.output.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.build.strict_expressions, args.strict.as_ref());

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.server.interface, interface.as_ref());
            Self::update_option(&mut self.server.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a build.
    ///
    /// The output directory is deleted on every build, so it must be a
    /// proper sub-directory of the project root.
    pub fn validate(&self) -> Result<()> {
        let out_dir = &self.build.out_dir;

        if out_dir.as_os_str().is_empty() {
            bail!(ConfigError::Validation("[build.out_dir] must not be empty".into()));
        }

        let mut depth = 0usize;
        for component in out_dir.components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::CurDir => {}
                _ => bail!(ConfigError::Validation(format!(
                    "[build.out_dir] `{}` must stay inside the project root",
                    out_dir.display()
                ))),
            }
        }
        if depth == 0 {
            bail!(ConfigError::Validation(
                "[build.out_dir] must not be the project root".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_json_matches_toml_shape() {
        let config = SiteConfig::from_json(
            r#"{
                "site": { "title": "%page_name% | Json" },
                "build": { "outDir": "public", "components": { "prefix": "header" } },
                "server": { "port": 3000 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.site.title, "%page_name% | Json");
        assert_eq!(config.build.out_dir, PathBuf::from("public"));
        assert_eq!(config.build.components.prefix.as_deref(), Some("header"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_from_path_picks_format() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("marksite.toml");
        fs::write(&toml_path, "[build]\nout_dir = \"out\"\n").unwrap();
        let json_path = dir.path().join("site.json");
        fs::write(&json_path, r#"{ "build": { "out_dir": "json-out" } }"#).unwrap();

        let config = SiteConfig::from_path(&toml_path).unwrap();
        assert_eq!(config.build.out_dir, PathBuf::from("out"));
        assert_eq!(config.config_path, toml_path);

        let config = SiteConfig::from_path(&json_path).unwrap();
        assert_eq!(config.build.out_dir, PathBuf::from("json-out"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/no/such/marksite.toml")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_unknown_section_rejection() {
        assert!(SiteConfig::from_str("[deploy]\nforce = true").is_err());
    }

    #[test]
    fn test_output_dir_joins_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/project"));
        assert_eq!(config.output_dir(), PathBuf::from("/project/dist"));
    }

    #[test]
    fn test_validate_out_dir() {
        let mut config = SiteConfig::default();
        assert!(config.validate().is_ok());

        for bad in ["", ".", "./", "../elsewhere", "/tmp/abs", "a/../.."] {
            config.build.out_dir = PathBuf::from(bad);
            assert!(config.validate().is_err(), "`{bad}` should be rejected");
        }

        config.build.out_dir = PathBuf::from("./build/site");
        assert!(config.validate().is_ok());
    }
}
