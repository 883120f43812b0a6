//! Destinations for generated files
//!
//! The generator never touches the filesystem. Commands hand its output to a
//! [`FileSink`]: [`DiskFileSink`] for real runs, [`MemoryFileSink`] for dry
//! runs and tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};

use archforge_generation::GeneratedFile;
use parking_lot::Mutex;
use tracing::debug;

/// Where generated files are written
pub trait FileSink: Send + Sync {
    /// Write `content` to `path`, replacing any previous content
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Whether `path` already exists
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and its missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Writes below a root directory
#[derive(Debug, Clone)]
pub struct DiskFileSink {
    root: PathBuf,
}

impl DiskFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSink for DiskFileSink {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(self.resolve(path), content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }
}

/// Keeps files in memory
#[derive(Debug, Default)]
pub struct MemoryFileSink {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate one file
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.lock().insert(path.into(), content.into());
        self
    }

    /// Content of one file
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().get(path.as_ref()).cloned()
    }

    /// Every file, sorted by path
    pub fn files(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl FileSink for MemoryFileSink {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files.lock().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path) || self.dirs.lock().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.lock();
        for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}

/// What happened to each generated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<String>,
    /// Files left alone because they already existed
    pub skipped: Vec<String>,
}

/// Write `files` to `sink`, skipping existing files unless `force` is set
pub fn write_files(
    sink: &dyn FileSink,
    files: &[GeneratedFile],
    force: bool,
) -> io::Result<WriteReport> {
    let mut report = WriteReport::default();
    for file in files {
        let path = Path::new(&file.path);
        if sink.exists(path) && !force {
            debug!(path = %file.path, "Skipping existing file");
            report.skipped.push(file.path.clone());
            continue;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            sink.create_dir_all(parent)?;
        }
        sink.write(path, &file.content)?;
        report.written.push(file.path.clone());
    }
    Ok(report)
}
