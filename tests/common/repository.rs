//! Base folder setup utilities
//!
//! Provides a temporary base folder that repositories can be added to, either
//! as bare `.git` markers (enough for scanning) or as real `git2` repositories
//! with commits (for the detail view).

#![allow(dead_code)]

use git2::{Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary base folder plus a separate folder for cache and config files.
/// Both `TempDir`s must stay alive for the duration of the test.
pub struct TestBase {
    pub temp_dir: TempDir,
    pub state_dir: TempDir,
    pub path: PathBuf,
}

impl TestBase {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Cache file location outside the base folder
    pub fn cache_file(&self) -> PathBuf {
        self.state_dir.path().join("cache").join("repo_status.json")
    }

    /// Folder that only looks like a repository: `<name>/.git`
    pub fn add_marker_repo(&self, name: &str) -> anyhow::Result<PathBuf> {
        let path = self.repo_path(name);
        fs::create_dir_all(path.join(".git"))?;
        Ok(path)
    }

    /// Plain folder that is not a repository
    pub fn add_plain_dir(&self, name: &str) -> anyhow::Result<PathBuf> {
        let path = self.repo_path(name);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Real repository with one committed file on `main`
    pub fn add_git_repo(&self, name: &str) -> anyhow::Result<PathBuf> {
        let path = self.repo_path(name);
        let repo = Repository::init(&path)?;
        repo.set_head("refs/heads/main")?;
        create_file(&path, "README.md", "# readme\n")?;
        commit_all(&repo, "Initial commit")?;
        Ok(path)
    }
}

pub fn setup_base() -> anyhow::Result<TestBase> {
    let temp_dir = TempDir::new()?;
    let state_dir = TempDir::new()?;
    let path = temp_dir.path().canonicalize()?;
    Ok(TestBase {
        temp_dir,
        state_dir,
        path,
    })
}

/// The alpha/beta layout: `alpha` is a repository, `beta` is not
pub fn setup_alpha_beta() -> anyhow::Result<TestBase> {
    let base = setup_base()?;
    base.add_marker_repo("alpha")?;
    base.add_plain_dir("beta")?;
    Ok(base)
}

pub fn create_file(dir: &Path, name: &str, content: &str) -> anyhow::Result<()> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn commit_all(repo: &Repository, message: &str) -> anyhow::Result<()> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::now("Test User", "test@example.com")?;
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
    Ok(())
}
