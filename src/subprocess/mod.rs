pub mod builder;
pub mod error;
pub mod git;
pub mod mock;
pub mod runner;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use git::{GitRunner, GitRunnerImpl};
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::path::Path;
use std::sync::Arc;

/// Entry point for everything that spawns processes
///
/// Production code gets a [`TokioProcessRunner`]; tests swap in a
/// [`MockProcessRunner`] and script git's answers.
#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn production() -> Self {
        Self::new(Arc::new(TokioProcessRunner))
    }

    pub fn mock() -> (Self, MockProcessRunner) {
        let mock = MockProcessRunner::new();
        let runner = Arc::new(mock.clone()) as Arc<dyn ProcessRunner>;
        (Self::new(runner), mock)
    }

    /// Git gateway rooted at `repo_path`
    pub fn git(&self, repo_path: &Path) -> GitRunnerImpl {
        GitRunnerImpl::new(Arc::clone(&self.runner), repo_path)
    }
}
