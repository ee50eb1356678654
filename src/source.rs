//! Source inputs and their staging into a walkable directory

use crate::error::{RagError, ValidationError};
use crate::git::{clone_repo, is_git_url};
use crate::types::{UploadedFile, validate_file_name};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Where the code to document comes from
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// Files uploaded inline, written into a fresh staging directory
    Files(Vec<UploadedFile>),
    /// A local directory, walked in place
    Folder(PathBuf),
    /// A repository URL, cloned into a fresh staging directory
    GitRepository(String),
}

impl SourceInput {
    /// Classify a user-supplied source string
    pub fn detect(source: &str) -> Result<Self, ValidationError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ValidationError::Empty("source".to_string()));
        }

        if is_git_url(source) {
            return Ok(Self::GitRepository(source.to_string()));
        }

        let path = Path::new(source);
        if !path.exists() {
            return Err(ValidationError::PathNotFound(source.to_string()));
        }
        if !path.is_dir() {
            return Err(ValidationError::InvalidSource(format!(
                "{} is neither a directory nor a git repository URL",
                source
            )));
        }

        Ok(Self::Folder(path.to_path_buf()))
    }

    /// Uploaded files win over a source string
    pub fn from_parts(
        files: Vec<UploadedFile>,
        source: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if !files.is_empty() {
            return Ok(Self::Files(files));
        }
        match source {
            Some(source) => Self::detect(source),
            None => Err(ValidationError::Empty("source".to_string())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Files(files) => format!("{} uploaded file(s)", files.len()),
            Self::Folder(path) => format!("folder {}", path.display()),
            Self::GitRepository(url) => format!("git repository {}", url),
        }
    }

    /// Materialize the source as a directory on disk.
    ///
    /// Blocking: writes files or clones a repository.
    pub fn stage(&self) -> Result<StagedSource, RagError> {
        match self {
            Self::Folder(path) => Ok(StagedSource {
                root: path.clone(),
                _temp: None,
            }),
            Self::Files(files) => {
                let temp = staging_dir()?;
                for file in files {
                    validate_file_name(&file.name)
                        .map_err(|_| ValidationError::InvalidFileName(file.name.clone()))?;
                    fs::write(temp.path().join(&file.name), &file.content)?;
                }
                tracing::info!(
                    "Staged {} uploaded file(s) in {}",
                    files.len(),
                    temp.path().display()
                );
                Ok(StagedSource {
                    root: temp.path().to_path_buf(),
                    _temp: Some(temp),
                })
            }
            Self::GitRepository(url) => {
                let temp = staging_dir()?;
                let cloned = clone_repo(url, temp.path())?;
                Ok(StagedSource {
                    root: cloned.path,
                    _temp: Some(temp),
                })
            }
        }
    }
}

fn staging_dir() -> Result<TempDir, RagError> {
    Ok(tempfile::Builder::new().prefix("codedoc-").tempdir()?)
}

/// A directory ready to walk; temporary staging is removed on drop
#[derive(Debug)]
pub struct StagedSource {
    root: PathBuf,
    _temp: Option<TempDir>,
}

impl StagedSource {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory is removed when this value is dropped
    pub fn is_temporary(&self) -> bool {
        self._temp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upload(name: &str, content: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_detect_git_url() {
        let source = SourceInput::detect("https://github.com/user/repo").unwrap();
        assert!(matches!(
            source,
            SourceInput::GitRepository(url) if url == "https://github.com/user/repo"
        ));
    }

    #[test]
    fn test_detect_folder() {
        let dir = TempDir::new().unwrap();
        let source = SourceInput::detect(dir.path().to_str().unwrap()).unwrap();
        assert!(matches!(source, SourceInput::Folder(p) if p == dir.path()));
    }

    #[test]
    fn test_detect_rejects_missing_path_and_plain_file() {
        assert!(matches!(
            SourceInput::detect("/nonexistent/project"),
            Err(ValidationError::PathNotFound(_))
        ));

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.py");
        fs::write(&file, "x = 1").unwrap();
        assert!(matches!(
            SourceInput::detect(file.to_str().unwrap()),
            Err(ValidationError::InvalidSource(_))
        ));

        assert!(matches!(
            SourceInput::detect("  "),
            Err(ValidationError::Empty(_))
        ));
    }

    #[test]
    fn test_from_parts_prefers_files() {
        let source =
            SourceInput::from_parts(vec![upload("a.py", "x")], Some("https://github.com/u/r"))
                .unwrap();
        assert!(matches!(source, SourceInput::Files(ref f) if f.len() == 1));
        assert!(SourceInput::from_parts(vec![], None).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            SourceInput::Files(vec![upload("a.py", ""), upload("b.py", "")]).describe(),
            "2 uploaded file(s)"
        );
        assert_eq!(
            SourceInput::GitRepository("https://gitlab.com/g/p".to_string()).describe(),
            "git repository https://gitlab.com/g/p"
        );
    }

    #[test]
    fn test_stage_folder_in_place() {
        let dir = TempDir::new().unwrap();
        let staged = SourceInput::Folder(dir.path().to_path_buf()).stage().unwrap();
        assert_eq!(staged.root(), dir.path());
        assert!(!staged.is_temporary());
    }

    #[test]
    fn test_stage_files_writes_and_cleans_up() {
        let source = SourceInput::Files(vec![
            upload("main.py", "def main():\n    pass\n"),
            upload("util.js", "function f() {}\n"),
        ]);

        let staged = source.stage().unwrap();
        let root = staged.root().to_path_buf();
        assert!(staged.is_temporary());
        assert_eq!(
            fs::read_to_string(root.join("main.py")).unwrap(),
            "def main():\n    pass\n"
        );
        assert!(root.join("util.js").exists());

        drop(staged);
        assert!(!root.exists());
    }

    #[test]
    fn test_stage_files_rejects_traversal() {
        let source = SourceInput::Files(vec![upload("../escape.py", "x")]);
        let err = source.stage().unwrap_err();
        assert!(matches!(
            err,
            RagError::Validation(ValidationError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_stage_unreachable_repository_fails() {
        let source = SourceInput::GitRepository("/nonexistent/upstream.git".to_string());
        assert!(matches!(source.stage(), Err(RagError::Git(_))));
    }
}
