//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::Command as BinCommand;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test context builder for setting up temporary repositories
pub struct TestContextBuilder {
    temp_dir: TempDir,
    with_git: bool,
    initial_files: Vec<(PathBuf, String)>,
    config: Vec<(String, String)>,
}

impl TestContextBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            with_git: false,
            initial_files: Vec::new(),
            config: Vec::new(),
        })
    }

    /// Initialize a repository on `main` with one commit
    pub fn with_git(mut self) -> Self {
        self.with_git = true;
        self
    }

    /// Add a file to the initial commit
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.initial_files
            .push((path.as_ref().to_path_buf(), content.to_string()));
        self
    }

    /// Set a local git config value after initialization
    pub fn with_config(mut self, key: &str, value: &str) -> Self {
        self.config.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Result<TestContext> {
        let path = self.temp_dir.path();

        for (file_path, content) in &self.initial_files {
            let full_path = path.join(file_path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full_path, content)?;
        }

        let context = TestContext {
            temp_dir: self.temp_dir,
        };

        if self.with_git {
            init_git_repo(context.path())?;
            if context.initial_files_missing() {
                context.create_file("README.md", "# test repository\n")?;
            }
            context.git(&["add", "-A"])?;
            context.git(&["commit", "-m", "Initial commit"])?;
            for (key, value) in &self.config {
                context.git(&["config", key, value])?;
            }
        }

        Ok(context)
    }
}

/// Temporary directory holding a test repository
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Command for the kaishaku binary running inside the repository
    pub fn kaishaku(&self) -> BinCommand {
        let mut cmd = BinCommand::cargo_bin("kaishaku").unwrap();
        cmd.current_dir(self.path()).env_remove("RUST_LOG");
        cmd
    }

    pub fn create_file(&self, path: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let full_path = self.temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        Ok(full_path)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(fs::read_to_string(self.temp_dir.path().join(path))?)
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.temp_dir.path().join(path).exists()
    }

    /// Run git and return trimmed stdout, failing on a non-zero status
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether git exits successfully for the given arguments
    pub fn git_succeeds(&self, args: &[&str]) -> bool {
        Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Commit every change in the working tree
    pub fn commit_all(&self, message: &str) -> Result<String> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-m", message])?;
        self.head()
    }

    pub fn head(&self) -> Result<String> {
        self.git(&["rev-parse", "HEAD"])
    }

    /// Current branch name, or `HEAD` when detached
    pub fn current_branch(&self) -> Result<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Directory holding the session records
    pub fn store_dir(&self) -> PathBuf {
        self.path().join(".git").join("kaishaku")
    }

    /// Content of one session record, without its trailing newline
    pub fn record(&self, session: &str, field: &str) -> Option<String> {
        fs::read_to_string(self.store_dir().join(session).join(field))
            .ok()
            .map(|content| content.trim_end().to_string())
    }

    pub fn active_session(&self) -> Option<String> {
        fs::read_to_string(self.store_dir().join(".active"))
            .ok()
            .map(|content| content.trim_end().to_string())
            .filter(|name| !name.is_empty())
    }

    fn initial_files_missing(&self) -> bool {
        fs::read_dir(self.path())
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .all(|entry| entry.file_name() == ".git")
            })
            .unwrap_or(true)
    }
}

/// Initialize a git repository with an identity and `main` checked out
pub fn init_git_repo(path: &Path) -> Result<()> {
    let run = |args: &[&str]| -> Result<()> {
        let output = Command::new("git").current_dir(path).args(args).output()?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(())
    };

    run(&["init", "--quiet"])?;
    run(&["symbolic-ref", "HEAD", "refs/heads/main"])?;
    run(&["config", "user.email", "test@example.com"])?;
    run(&["config", "user.name", "Test User"])?;
    run(&["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Repository on `main` with a single tracked file
pub fn repo_with_file(path: &str, content: &str) -> TestContext {
    TestContextBuilder::new()
        .unwrap()
        .with_git()
        .with_file(path, content)
        .build()
        .unwrap()
}
