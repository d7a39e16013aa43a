//! In-memory content tree.
//!
//! A project is a set of named branches (`pages`, `components`, `templates`,
//! `styles`, `resources`) plus its configuration. Every branch is an owned
//! [`Folder`] whose children are keyed by their on-disk entry name, so the
//! same shape is reused for parsed pages and rendered output via
//! [`Folder::try_map`].

pub mod loader;

use crate::config::SiteConfig;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub use loader::load_project;

/// Anything stored as a file in a [`Folder`].
pub trait Named {
    /// Entry name without extension.
    fn name(&self) -> &str;
}

/// A raw file as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub extension: String,
    pub content: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, extension: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            content: content.into(),
        }
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// `{name}.{extension}`, or just `{name}` without an extension.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }
}

impl Named for File {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<F> {
    File(F),
    Folder(Folder<F>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder<F> {
    pub name: String,
    pub children: BTreeMap<String, Entry<F>>,
}

impl<F> Folder<F> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of files in this folder and all sub-folders.
    pub fn file_count(&self) -> usize {
        self.children
            .values()
            .map(|entry| match entry {
                Entry::File(_) => 1,
                Entry::Folder(folder) => folder.file_count(),
            })
            .sum()
    }

    /// Every file paired with its `/`-joined key path, depth first.
    pub fn files(&self) -> Vec<(String, &F)> {
        let mut out = Vec::new();
        self.collect_files("", &mut out);
        out
    }

    fn collect_files<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a F)>) {
        for (key, entry) in &self.children {
            let path = join_path(prefix, key);
            match entry {
                Entry::File(file) => out.push((path, file)),
                Entry::Folder(folder) => folder.collect_files(&path, out),
            }
        }
    }

    /// Every sub-folder (including `self`) paired with its key path.
    pub fn folders(&self) -> Vec<(String, &Folder<F>)> {
        let mut out = vec![(String::new(), self)];
        self.collect_folders("", &mut out);
        out
    }

    fn collect_folders<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Folder<F>)>) {
        for (key, entry) in &self.children {
            if let Entry::Folder(folder) = entry {
                let path = join_path(prefix, key);
                out.push((path.clone(), folder));
                folder.collect_folders(&path, out);
            }
        }
    }

    /// Map every file, preserving the folder structure.
    pub fn try_map<T, E>(&self, f: &mut impl FnMut(&str, &F) -> Result<T, E>) -> Result<Folder<T>, E> {
        self.try_map_at("", f)
    }

    fn try_map_at<T, E>(
        &self,
        prefix: &str,
        f: &mut impl FnMut(&str, &F) -> Result<T, E>,
    ) -> Result<Folder<T>, E> {
        let mut mapped = Folder::new(self.name.clone());
        for (key, entry) in &self.children {
            let path = join_path(prefix, key);
            let entry = match entry {
                Entry::File(file) => Entry::File(f(&path, file)?),
                Entry::Folder(folder) => Entry::Folder(folder.try_map_at(&path, f)?),
            };
            mapped.children.insert(key.clone(), entry);
        }
        Ok(mapped)
    }
}

impl<F: Named> Folder<F> {
    /// Look up one child by key, falling back to a file whose name matches.
    pub fn child(&self, segment: &str) -> Option<(&str, &Entry<F>)> {
        if let Some((key, entry)) = self.children.get_key_value(segment) {
            return Some((key.as_str(), entry));
        }
        self.children
            .iter()
            .find(|(_, entry)| matches!(entry, Entry::File(file) if file.name() == segment))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Resolve a `/`-separated path segment by segment.
    ///
    /// `/` and the empty path resolve to `self`. Returns the canonical key
    /// path of the match along with it.
    pub fn find(&self, path: &str) -> Option<(String, FoundRef<'_, F>)> {
        let mut current = FoundRef::Folder(self);
        let mut canonical = String::new();

        for segment in segments(path) {
            let FoundRef::Folder(folder) = current else {
                return None;
            };
            let (key, entry) = folder.child(segment)?;
            canonical = join_path(&canonical, key);
            current = match entry {
                Entry::File(file) => FoundRef::File(file),
                Entry::Folder(folder) => FoundRef::Folder(folder),
            };
        }

        Some((canonical, current))
    }

    /// Resolve `path` to a file, rejecting folders.
    pub fn resolve_file(&self, path: &str) -> Option<(String, &F)> {
        match self.find(path)? {
            (canonical, FoundRef::File(file)) => Some((canonical, file)),
            (_, FoundRef::Folder(_)) => None,
        }
    }
}

/// Borrowed result of [`Folder::find`].
#[derive(Debug)]
pub enum FoundRef<'a, F> {
    File(&'a F),
    Folder(&'a Folder<F>),
}

impl<F> Clone for FoundRef<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FoundRef<'_, F> {}

/// Split a lookup path into non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Canonical form of a lookup path: segments joined by `/`.
pub fn normalize_path(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

/// A fully loaded project.
#[derive(Debug, Clone)]
pub struct ContentTree {
    pub pages: Folder<File>,
    pub components: Folder<File>,
    pub templates: Folder<File>,
    pub styles: Folder<File>,
    pub resources: Folder<File>,
    pub config: SiteConfig,
}

impl ContentTree {
    /// Empty tree with the given configuration.
    pub fn new(config: SiteConfig) -> Self {
        Self {
            pages: Folder::new("pages"),
            components: Folder::new("components"),
            templates: Folder::new("templates"),
            styles: Folder::new("styles"),
            resources: Folder::new("resources"),
            config,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Insert a text file at `path`, creating folders on the way.
    pub fn put(folder: &mut Folder<File>, path: &str, content: &str) {
        let parts: Vec<&str> = segments(path).collect();
        let Some((file_name, dirs)) = parts.split_last() else {
            return;
        };
        let mut current = folder;
        for dir in dirs {
            let entry = current
                .children
                .entry(dir.to_string())
                .or_insert_with(|| Entry::Folder(Folder::new(*dir)));
            current = match entry {
                Entry::Folder(folder) => folder,
                Entry::File(_) => panic!("{dir} is a file"),
            };
        }
        let (name, extension) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
        current.children.insert(
            file_name.to_string(),
            Entry::File(File::new(name, extension, content)),
        );
    }

    fn sample() -> Folder<File> {
        let mut root = Folder::new("components");
        put(&mut root, "nav/header.md", "# Header");
        put(&mut root, "nav/links/social.md", "- a");
        put(&mut root, "footer.md", "bye");
        root
    }

    #[test]
    fn test_find_by_key_and_by_name() {
        let root = sample();
        let (path, file) = root.resolve_file("nav/header.md").unwrap();
        assert_eq!(path, "nav/header.md");
        assert_eq!(file.name, "header");

        let (path, _) = root.resolve_file("/nav/header").unwrap();
        assert_eq!(path, "nav/header.md");
    }

    #[test]
    fn test_find_root_and_folders() {
        let root = sample();
        assert!(matches!(root.find("/"), Some((p, FoundRef::Folder(_))) if p.is_empty()));
        assert!(matches!(root.find("nav/links/"), Some((_, FoundRef::Folder(f))) if f.name == "links"));
        assert!(root.resolve_file("nav").is_none());
    }

    #[test]
    fn test_find_missing_or_through_file() {
        let root = sample();
        assert!(root.find("nope").is_none());
        assert!(root.find("footer/extra").is_none());
    }

    #[test]
    fn test_files_and_counts() {
        let root = sample();
        let paths: Vec<String> = root.files().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec!["footer.md", "nav/header.md", "nav/links/social.md"]
        );
        assert_eq!(root.file_count(), 3);
        let folders: Vec<String> = root.folders().into_iter().map(|(p, _)| p).collect();
        assert_eq!(folders, vec!["", "nav", "nav/links"]);
    }

    #[test]
    fn test_try_map_preserves_shape() {
        let root = sample();
        let mapped: Folder<usize> = root
            .try_map(&mut |_, file: &File| Ok::<_, ()>(file.content.len()))
            .unwrap();
        assert!(matches!(mapped.children.get("footer.md"), Some(Entry::File(3))));
        assert!(matches!(mapped.children.get("nav"), Some(Entry::Folder(_))));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(File::new("a", "css", "").file_name(), "a.css");
        assert_eq!(File::new("README", "", "").file_name(), "README");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/blog//posts/"), "blog/posts");
        assert_eq!(normalize_path("/"), "");
    }
}
