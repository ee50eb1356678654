//! Line scanning: boundary detection and line sizing

use super::language::SourceLanguage;
use serde::{Deserialize, Serialize};

/// Language-agnostic fallback markers used when a file's language is unknown
pub const GENERIC_MARKERS: &[&str] = &[
    "def ",
    "class ",
    "if __name__",
    "# %%",
    "\"\"\"",
    "function ",
    "public class",
    "export class",
    "interface ",
    "struct ",
    "void ",
];

/// How boundary markers are selected for a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Markers of the file's language, generic markers for unknown extensions
    #[default]
    Language,
    /// The generic marker list for every file
    Generic,
    /// No boundaries: pure size-threshold chunking
    None,
}

/// Classifies lines as boundaries against a fixed marker set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScanner {
    markers: &'static [&'static str],
}

impl LineScanner {
    pub const fn new(markers: &'static [&'static str]) -> Self {
        Self { markers }
    }

    /// Scanner using the generic cross-language marker list
    pub const fn generic() -> Self {
        Self::new(GENERIC_MARKERS)
    }

    /// Scanner that never reports a boundary
    pub const fn size_only() -> Self {
        Self::new(&[])
    }

    pub fn for_language(language: SourceLanguage) -> Self {
        Self::new(language.boundary_markers())
    }

    /// Pick the scanner for a file according to the boundary mode
    pub fn select(mode: BoundaryMode, extension: Option<&str>) -> Self {
        match mode {
            BoundaryMode::None => Self::size_only(),
            BoundaryMode::Generic => Self::generic(),
            BoundaryMode::Language => extension
                .and_then(SourceLanguage::from_extension)
                .map(Self::for_language)
                .unwrap_or_else(Self::generic),
        }
    }

    pub fn markers(&self) -> &'static [&'static str] {
        self.markers
    }

    /// True iff the stripped line starts with one of the markers
    pub fn is_boundary(&self, line: &str) -> bool {
        let stripped = line.trim();
        !stripped.is_empty() && self.markers.iter().any(|m| stripped.starts_with(m))
    }
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::generic()
    }
}

/// Boundary check against the generic marker list
pub fn is_boundary(line: &str) -> bool {
    LineScanner::generic().is_boundary(line)
}

/// Size of a line in characters
pub fn line_size(line: &str) -> usize {
    line.chars().count()
}
