//! File walking functionality for directory traversal

use super::file_info::FileInfo;
use super::language::detect_language;
use crate::error::IndexingError;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions processed when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".java", ".cpp", ".h", ".tsx", ".jsx", ".ts",
];

pub struct FileWalker {
    pub(crate) root: PathBuf,
    pub(crate) max_file_size: usize,
    pub(crate) extensions: Vec<String>,
    pub(crate) exclude_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>, max_file_size: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_size,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_patterns: vec![],
        }
    }

    /// Only keep files whose name ends with one of these suffixes.
    /// An empty list keeps every file.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude_patterns(mut self, exclude_patterns: Vec<String>) -> Self {
        self.exclude_patterns = exclude_patterns;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory and collect the paths of all eligible files.
    ///
    /// Contents are not read here so that callers can load files
    /// independently and skip the ones that fail.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(IndexingError::DirectoryNotFound(self.root.display().to_string()).into());
        }
        if !self.root.is_dir() {
            return Err(IndexingError::NotADirectory(self.root.display().to_string()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(true) // Respect .gitignore, .ignore, etc.
            .hidden(false)
            .require_git(false)
            // Only ignore files inside the walked tree apply
            .parents(false)
            .build();

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_dir() {
                continue;
            }

            if path.components().any(|c| c.as_os_str() == ".git") {
                continue;
            }

            if !self.matches_extension(path) || self.is_excluded(path) {
                continue;
            }

            if let Ok(metadata) = fs::metadata(path)
                && metadata.len() > self.max_file_size as u64
            {
                tracing::debug!("Skipping large file: {:?}", path);
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        tracing::info!("Found {} files to process", files.len());
        Ok(files)
    }

    /// Read one discovered file as UTF-8 text
    pub fn load(&self, path: &Path) -> Result<FileInfo, IndexingError> {
        let read_failed = |reason: String| IndexingError::FileReadFailed {
            file: path.display().to_string(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| read_failed(e.to_string()))?;

        if !is_text(&bytes) {
            return Err(read_failed("file appears to be binary".to_string()));
        }

        let content = String::from_utf8(bytes).map_err(|e| read_failed(e.to_string()))?;

        let relative_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let extension = path.extension().and_then(|e| e.to_str()).map(String::from);
        let language = extension.as_ref().and_then(|ext| detect_language(ext));
        let hash = calculate_hash(&content);

        Ok(FileInfo {
            path: path.to_path_buf(),
            relative_path,
            extension,
            language,
            content,
            hash,
        })
    }

    /// Discover and load every file, skipping those that fail to load
    pub fn walk(&self) -> Result<Vec<FileInfo>> {
        let files = self
            .discover()?
            .into_iter()
            .filter_map(|path| match self.load(&path) {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        Ok(files)
    }

    pub(crate) fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    pub(crate) fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        self.exclude_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }
}

/// Heuristic: more than 30% control bytes means binary
pub(crate) fn is_text(content: &[u8]) -> bool {
    if content.is_empty() {
        return true;
    }

    let non_printable = content
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    (non_printable as f64 / content.len() as f64) < 0.3
}

pub(crate) fn calculate_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
