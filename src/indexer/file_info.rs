//! File information structure for discovered source files

use std::path::PathBuf;

/// A source file read from the staged tree
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    /// Path relative to the staged root, used in chunk metadata
    pub relative_path: String,
    /// Extension without the leading dot
    pub extension: Option<String>,
    pub language: Option<String>,
    pub content: String,
    /// SHA256 of the content
    pub hash: String,
}
