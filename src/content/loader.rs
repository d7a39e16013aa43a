//! Loads a project directory into a [`ContentTree`].

use super::{ContentTree, Entry, File, Folder};
use crate::config::SiteConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

pub const PAGES_DIR: &str = "pages";
pub const COMPONENTS_DIR: &str = "components";
pub const STYLES_DIR: &str = "styles";
pub const RESOURCES_DIR: &str = "resources";

/// Read every branch of the project rooted at `config.root`.
///
/// Missing branch directories load as empty folders.
pub fn load_project(config: SiteConfig) -> Result<ContentTree> {
    let root = config.get_root().to_path_buf();
    let templates_dir = config.build.templates.clone();

    let mut tree = ContentTree::new(config);
    tree.pages = load_folder(&root.join(PAGES_DIR), PAGES_DIR)?;
    tree.components = load_folder(&root.join(COMPONENTS_DIR), COMPONENTS_DIR)?;
    tree.styles = load_folder(&root.join(STYLES_DIR), STYLES_DIR)?;
    tree.resources = load_folder(&root.join(RESOURCES_DIR), RESOURCES_DIR)?;
    tree.templates = load_folder(&root.join(&templates_dir), &templates_dir.to_string_lossy())?;

    Ok(tree)
}

/// Load one directory recursively.
pub fn load_folder(dir: &Path, name: &str) -> Result<Folder<File>> {
    let mut folder = Folder::new(name);
    if !dir.is_dir() {
        return Ok(folder);
    }

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if IGNORED_FILES.contains(&file_name.as_str()) {
            continue;
        }

        let relative = entry.path().strip_prefix(dir)?;
        let parents: Vec<String> = relative
            .parent()
            .map(|p| p.iter().map(|s| s.to_string_lossy().into_owned()).collect())
            .unwrap_or_default();
        let parent = folder_at(&mut folder, &parents)?;

        if entry.file_type().is_dir() {
            parent
                .children
                .entry(file_name.clone())
                .or_insert_with(|| Entry::Folder(Folder::new(file_name)));
        } else if entry.file_type().is_file() {
            let content = fs::read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;
            let path = Path::new(&file_name);
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone());
            let extension = path
                .extension()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            parent
                .children
                .insert(file_name, Entry::File(File::new(name, extension, content)));
        }
    }

    Ok(folder)
}

/// Walk down `segments`, creating folders as needed.
fn folder_at<'a>(root: &'a mut Folder<File>, segments: &[String]) -> Result<&'a mut Folder<File>> {
    let mut current = root;
    for segment in segments {
        let entry = current
            .children
            .entry(segment.clone())
            .or_insert_with(|| Entry::Folder(Folder::new(segment.clone())));
        current = match entry {
            Entry::Folder(folder) => folder,
            Entry::File(_) => bail!("`{segment}` is both a file and a folder"),
        };
    }
    Ok(current)
}
