use std::path::Path;

use crate::subprocess::ProcessCommand;

/// Fluent construction of a [`ProcessCommand`]
///
/// ```
/// use kaishaku::subprocess::ProcessCommandBuilder;
///
/// let command = ProcessCommandBuilder::new("git")
///     .args(["rev-parse", "--git-dir"])
///     .build();
/// assert_eq!(command.display(), "git rev-parse --git-dir");
/// ```
pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                working_dir: None,
            },
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command
            .args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_string()));
        self
    }

    /// Run the command inside `dir` instead of the caller's directory
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.working_dir = Some(dir.to_path_buf());
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
