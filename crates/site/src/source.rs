//! Where page markup comes from.
//!
//! A [`SiteSource`] yields `path → markup` for every page of a site. Keys use `/` separators.
use crate::error::LoadError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub type Pages = BTreeMap<String, String>;

pub trait SiteSource {
    fn load(&self) -> Result<Pages, LoadError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Reads a single file's content by path.
pub trait FileReader {
    fn read_to_string(&self, path: &str) -> Result<String, LoadError>;
}

/// Reads from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskReader;

impl FileReader for DiskReader {
    fn read_to_string(&self, path: &str) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::io(path, source))
    }
}

/// Returns the same content for every path.
#[derive(Clone, Debug)]
pub struct FixedReader {
    content: String,
}

impl FixedReader {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl FileReader for FixedReader {
    fn read_to_string(&self, _path: &str) -> Result<String, LoadError> {
        Ok(self.content.clone())
    }
}

/// Every file under `root` whose name ends with `suffix`, keyed by its path including `root`
/// (`public/posts/a.html` for root `public`). Symlinks are followed; a link cycle is an error.
#[derive(Clone, Debug)]
pub struct DiskSource {
    root: PathBuf,
    suffix: String,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SiteSource for DiskSource {
    fn load(&self) -> Result<Pages, LoadError> {
        let mut pages = Pages::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(self.root.as_path()).to_path_buf();
                LoadError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let matches_suffix = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&self.suffix));
            if !matches_suffix {
                continue;
            }
            let content = fs::read_to_string(path).map_err(|source| LoadError::io(path, source))?;
            let key = path_key(path);
            log::debug!(target: "site.load", "loaded {key} ({} bytes)", content.len());
            pages.insert(key, content);
        }

        Ok(pages)
    }

    fn describe(&self) -> String {
        format!("{} (*{})", self.root.display(), self.suffix)
    }
}

/// `/`-joined path without `.` components.
fn path_key(path: &Path) -> String {
    let mut key = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::RootDir => key.push('/'),
            Component::Prefix(prefix) => key.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::ParentDir | Component::Normal(_) => {
                if !key.is_empty() && !key.ends_with('/') {
                    key.push('/');
                }
                key.push_str(&component.as_os_str().to_string_lossy());
            }
        }
    }
    key
}

/// An explicit list of paths read through a [`FileReader`].
#[derive(Clone, Debug)]
pub struct ListSource<R> {
    paths: Vec<String>,
    reader: R,
}

impl<R: FileReader> ListSource<R> {
    pub fn new(paths: Vec<String>, reader: R) -> Self {
        Self { paths, reader }
    }
}

impl<R: FileReader> SiteSource for ListSource<R> {
    fn load(&self) -> Result<Pages, LoadError> {
        let mut pages = Pages::new();
        for path in &self.paths {
            let content = self.reader.read_to_string(path)?;
            pages.insert(path.clone(), content);
        }
        Ok(pages)
    }

    fn describe(&self) -> String {
        format!("{} listed files", self.paths.len())
    }
}

/// Pages held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    pages: Pages,
}

impl MemorySource {
    pub fn new(pages: Pages) -> Self {
        Self { pages }
    }

    /// A site consisting of one page.
    pub fn single(path: impl Into<String>, content: impl Into<String>) -> Self {
        let mut pages = Pages::new();
        pages.insert(path.into(), content.into());
        Self { pages }
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.pages.insert(path.into(), content.into());
    }
}

impl SiteSource for MemorySource {
    fn load(&self) -> Result<Pages, LoadError> {
        Ok(self.pages.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory pages", self.pages.len())
    }
}

impl FileReader for MemorySource {
    fn read_to_string(&self, path: &str) -> Result<String, LoadError> {
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

impl<S: SiteSource + ?Sized> SiteSource for Box<S> {
    fn load(&self) -> Result<Pages, LoadError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
