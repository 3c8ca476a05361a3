use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::builder::ProcessCommandBuilder;
use super::runner::ProcessRunner;
use crate::git::{first_line, non_empty_lines, GitError};

/// Gateway to the git command line
///
/// Every call spawns exactly one `git` process and waits for it. Only
/// [`GitRunner::run`] and [`GitRunner::run_lines`] talk to the process
/// runner; the remaining methods name the capabilities the session
/// lifecycle needs and are expressed on top of them.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run git with `args`, returning the first stdout line when
    /// `capture_first_line` is set and an empty string otherwise
    async fn run(&self, args: &[&str], capture_first_line: bool) -> Result<String, GitError>;

    /// Run git with `args`, returning every non-blank stdout line
    async fn run_lines(&self, args: &[&str]) -> Result<Vec<String>, GitError>;

    /// Path of the repository's git directory, possibly relative
    async fn git_dir(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--git-dir"], true).await
    }

    /// Symbolic name of HEAD (`HEAD` itself when detached)
    async fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"], true).await
    }

    /// Resolve any revision to a full commit id
    async fn resolve_commit(&self, rev: &str) -> Result<String, GitError> {
        let spec = format!("{rev}^{{commit}}");
        self.run(&["rev-parse", "--verify", &spec], true).await
    }

    /// Check whether a branch, tag or commit exists
    ///
    /// Peeling to `^{commit}` makes git look the object up; a bare
    /// 40-character id verifies even when no such commit exists.
    async fn ref_exists(&self, rev: &str) -> bool {
        let spec = format!("{rev}^{{commit}}");
        self.run(&["rev-parse", "--verify", "--quiet", &spec], false)
            .await
            .is_ok()
    }

    async fn checkout(&self, rev: &str, detach: bool) -> Result<(), GitError> {
        let mut args = vec!["checkout", rev];
        if detach {
            args.push("--detach");
        }
        self.run(&args, false).await.map(|_| ())
    }

    /// Create a branch at HEAD and switch to it
    async fn checkout_new_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["checkout", "-b", name], false).await.map(|_| ())
    }

    /// Create a branch at HEAD without switching to it
    async fn create_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["branch", name], false).await.map(|_| ())
    }

    async fn merge(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["merge", "--no-edit", branch], false)
            .await
            .map(|_| ())
    }

    async fn merge_abort(&self) -> Result<(), GitError> {
        self.run(&["merge", "--abort"], false).await.map(|_| ())
    }

    async fn delete_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["branch", "-D", name], false).await.map(|_| ())
    }

    async fn stash_push(&self, message: &str) -> Result<(), GitError> {
        self.run(&["stash", "push", "-m", message], false)
            .await
            .map(|_| ())
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.run(&["add", "-A"], false).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message], false).await.map(|_| ())
    }

    async fn reset_hard(&self) -> Result<(), GitError> {
        self.run(&["reset", "--hard"], false).await.map(|_| ())
    }

    /// Whether the working tree has uncommitted changes
    async fn has_changes(&self) -> Result<bool, GitError> {
        let line = self.run(&["status", "--porcelain"], true).await?;
        Ok(!line.is_empty())
    }

    /// `git status --short` lines
    async fn short_status(&self) -> Result<Vec<String>, GitError> {
        self.run_lines(&["status", "--short"]).await
    }

    /// One-line summary of the commit HEAD points at
    async fn last_commit(&self) -> Result<String, GitError> {
        self.run(&["log", "--oneline", "-1"], true).await
    }

    /// Read a config value; `None` when the key is unset
    async fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        match self.run(&["config", "--get", key], true).await {
            Ok(value) => Ok(Some(value)),
            // git config exits 1 when the key does not exist
            Err(err) if err.exited_with(1) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Write a value to the repository-local config
    async fn config_set(&self, key: &str, value: &str) -> Result<(), GitError> {
        self.run(&["config", "--local", key, value], false)
            .await
            .map(|_| ())
    }
}

pub struct GitRunnerImpl {
    runner: Arc<dyn ProcessRunner>,
    repo_path: PathBuf,
}

impl GitRunnerImpl {
    pub fn new(runner: Arc<dyn ProcessRunner>, repo_path: &Path) -> Self {
        Self {
            runner,
            repo_path: repo_path.to_path_buf(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    async fn execute(&self, args: &[&str]) -> Result<String, GitError> {
        let command = ProcessCommandBuilder::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .build();
        let command_line = command.display();

        let output = self
            .runner
            .run(command)
            .await
            .map_err(|source| GitError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command: command_line,
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl GitRunner for GitRunnerImpl {
    async fn run(&self, args: &[&str], capture_first_line: bool) -> Result<String, GitError> {
        let stdout = self.execute(args).await?;
        if capture_first_line {
            Ok(first_line(&stdout))
        } else {
            Ok(String::new())
        }
    }

    async fn run_lines(&self, args: &[&str]) -> Result<Vec<String>, GitError> {
        let stdout = self.execute(args).await?;
        Ok(non_empty_lines(&stdout))
    }
}
