//! Git repository sources
//!
//! Recognizes repository URLs and clones them into a staging directory so the
//! regular file walker can process their contents.

use crate::error::GitError;
use git2::Repository;
use std::path::{Path, PathBuf};

/// Hosts whose https URLs are treated as repositories even without a `.git` suffix
const KNOWN_HOSTS: &[&str] = &[
    "https://github.com",
    "https://gitlab.com",
    "https://bitbucket.org",
];

/// Whether `url` looks like a clonable git repository
pub fn is_git_url(url: &str) -> bool {
    let url = url.trim();
    url.ends_with(".git") || KNOWN_HOSTS.iter().any(|host| url.starts_with(host))
}

/// A freshly cloned working tree
#[derive(Debug, Clone)]
pub struct ClonedRepo {
    pub path: PathBuf,
    /// Checked-out branch, None on a detached or unborn HEAD
    pub branch: Option<String>,
    /// Full SHA of HEAD, None for an empty repository
    pub head: Option<String>,
}

/// Clone `url` into `target`, which must be empty or not yet exist
pub fn clone_repo(url: &str, target: &Path) -> Result<ClonedRepo, GitError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(GitError::InvalidUrl(url.to_string()));
    }

    tracing::info!("Cloning {} into {}", url, target.display());

    let repo = Repository::clone(url, target).map_err(|e| GitError::CloneFailed {
        url: url.to_string(),
        reason: e.message().to_string(),
    })?;

    let head = repo.head().ok();
    let branch = head
        .as_ref()
        .filter(|h| h.is_branch())
        .and_then(|h| h.shorthand())
        .map(|s| s.to_string());
    let commit = head
        .as_ref()
        .and_then(|h| h.target())
        .map(|oid| oid.to_string());

    tracing::info!(
        "Cloned {} (branch: {}, head: {})",
        url,
        branch.as_deref().unwrap_or("detached"),
        commit.as_deref().map(|c| &c[..c.len().min(8)]).unwrap_or("none")
    );

    Ok(ClonedRepo {
        path: target.to_path_buf(),
        branch,
        head: commit,
    })
}
