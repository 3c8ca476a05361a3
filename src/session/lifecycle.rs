use std::path::Path;
use std::sync::Arc;

use super::outcome::{
    AbortOutcome, ActiveSessionReport, BranchOffOutcome, ChangeDisposition, ExitOutcome,
    OpenOutcome, PurgeOutcome, RecoverOutcome, RenameOutcome, ResumeOutcome, SaveBackOutcome,
    StatusReport,
};
use super::record::{format_timestamp, HeadRef, Session, SessionEntry, SessionHealth, HEAD_SENTINEL};
use super::registry::{ActiveStatus, SessionListing, SessionRegistry};
use super::{validate_branch_name, validate_session_name};
use crate::config::ToolConfig;
use crate::error::{ErrorCode, KaishakuError, Result};
use crate::interaction::UserPrompter;
use crate::storage::{ActivePointer, RecordField, RecordStore};
use crate::subprocess::GitRunner;

/// Question asked before uncommitted changes are thrown away
pub const DISCARD_PROMPT: &str = "Discard uncommitted changes and exit?";

/// How the user asked to leave a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitMode {
    #[default]
    Default,
    /// Discard changes without asking
    Force,
    /// Stash changes
    Keep,
    /// Commit changes
    Save,
    /// Never commit, even with `auto.save` set
    NoSave,
}

/// Exit flags after configuration has been folded in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlan {
    pub force: bool,
    pub keep: bool,
    pub save: bool,
}

impl ExitPlan {
    pub fn resolve(mode: ExitMode, config: &ToolConfig) -> Self {
        let force = mode == ExitMode::Force;
        let no_save = mode == ExitMode::NoSave;
        let save = mode == ExitMode::Save || (config.auto_save && !no_save);
        let keep = mode == ExitMode::Keep || (config.auto_stash && !save && !force);
        Self { force, keep, save }
    }

    /// Whether discarding changes needs the user's consent
    pub fn needs_confirmation(&self, config: &ToolConfig) -> bool {
        !self.force && !self.keep && !self.save && config.confirm_exit
    }
}

/// Drives every session state transition
///
/// Each operation checks its preconditions against the record store and the
/// active pointer, asks git to move the working tree, and updates the records.
/// Nothing is printed here; callers render the returned outcome.
pub struct SessionLifecycle {
    store: RecordStore,
    active: ActivePointer,
    registry: SessionRegistry,
    git: Arc<dyn GitRunner>,
    prompter: Arc<dyn UserPrompter>,
    config: ToolConfig,
}

impl SessionLifecycle {
    pub fn new(
        store_root: &Path,
        git: Arc<dyn GitRunner>,
        prompter: Arc<dyn UserPrompter>,
        config: ToolConfig,
    ) -> Self {
        let store = RecordStore::new(store_root);
        let active = ActivePointer::new(store_root);
        let registry = SessionRegistry::new(store.clone(), active.clone(), Arc::clone(&git));
        Self {
            store,
            active,
            registry,
            git,
            prompter,
            config,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Start a new session detached at `rev` (default `HEAD`)
    pub async fn open(&self, name: &str, rev: Option<&str>) -> Result<OpenOutcome> {
        validate_session_name(name)?;

        if let Some(entry) = self.registry.inspect(name).await? {
            if entry.health.is_well_formed() {
                return Err(KaishakuError::session_exists(name));
            }
            tracing::warn!(
                "Reusing corrupted session directory '{}' ({})",
                name,
                entry.health.describe()
            );
        }

        let original_ref = self.git.current_branch().await?;
        if original_ref == HEAD_SENTINEL {
            return Err(KaishakuError::state_with_code(
                ErrorCode::STATE_DETACHED_HEAD,
                "HEAD is detached. Check out a branch before opening a session.",
                Some(name),
            ));
        }

        let rev = rev.unwrap_or(HEAD_SENTINEL);
        let commit = self.git.resolve_commit(rev).await.map_err(|err| {
            KaishakuError::from(err)
                .with_code(ErrorCode::STATE_REF_MISSING)
                .with_context(format!("Cannot resolve '{rev}' to a commit"))
        })?;

        let previous = self.active.get().await?;

        // session, head, time: a crash part way leaves a detectable gap
        let written = self.write_new_records(name, &original_ref, &commit).await;
        if let Err(err) = written {
            self.discard_records(name).await;
            return Err(err);
        }

        if let Err(err) = self.active.set(name).await {
            self.discard_records(name).await;
            return Err(err);
        }

        if let Err(err) = self.git.checkout(&commit, true).await {
            self.discard_records(name).await;
            self.restore_pointer(previous.as_deref()).await;
            return Err(KaishakuError::from(err).with_context(format!("Failed to check out {commit}")));
        }

        tracing::debug!("Opened session '{}' at {} from {}", name, commit, original_ref);
        Ok(OpenOutcome {
            name: name.to_string(),
            original_ref,
            commit,
        })
    }

    /// Make an existing session active and check out its head
    pub async fn resume(&self, name: &str) -> Result<ResumeOutcome> {
        validate_session_name(name)?;

        let entry = self
            .registry
            .inspect(name)
            .await?
            .ok_or_else(|| KaishakuError::session_not_found(name))?;

        let head_ref = entry.records.head_ref.as_deref().map(HeadRef::parse).ok_or_else(|| {
            KaishakuError::corruption(
                ErrorCode::CORRUPTION_MISSING_HEAD_REF,
                name,
                "the head record is missing",
            )
        })?;

        let mut warnings = Vec::new();
        if !entry.health.is_well_formed() {
            warnings.push(format!(
                "Session '{name}' is {}; exiting it will fail until it is recovered.",
                entry.health.describe()
            ));
        }

        self.activate(name, &head_ref).await?;

        Ok(ResumeOutcome {
            name: name.to_string(),
            head_ref,
            warnings,
        })
    }

    /// Turn the active session's work into a real branch
    pub async fn branch_off(&self, branch: &str) -> Result<BranchOffOutcome> {
        validate_branch_name(branch)?;
        let session = self.active_session().await?;

        self.git
            .checkout_new_branch(branch)
            .await
            .map_err(|err| {
                KaishakuError::from(err).with_context(format!("Failed to create branch '{branch}'"))
            })?;

        self.store
            .put(&session.name, RecordField::HeadRef, HEAD_SENTINEL)
            .await?;
        self.store.touch(&session.name).await?;

        Ok(BranchOffOutcome {
            name: session.name,
            branch: branch.to_string(),
        })
    }

    /// Merge the active session's work into its original branch through a
    /// temporary branch named `branch`
    pub async fn save_back(&self, branch: &str) -> Result<SaveBackOutcome> {
        validate_branch_name(branch)?;
        let session = self.active_session().await?;
        let original = session.original_ref.clone();

        if !self.git.ref_exists(&original).await {
            return Err(KaishakuError::state_with_code(
                ErrorCode::STATE_REF_MISSING,
                format!(
                    "Original branch '{original}' of session '{}' no longer exists.",
                    session.name
                ),
                Some(&session.name),
            ));
        }

        if self.git.ref_exists(branch).await {
            return Err(KaishakuError::state_with_code(
                ErrorCode::STATE_BRANCH_EXISTS,
                format!("Branch '{branch}' already exists. Delete it or pick another name."),
                Some(&session.name),
            ));
        }

        self.git.create_branch(branch).await.map_err(|err| {
            KaishakuError::from(err).with_context(format!("Failed to create branch '{branch}'"))
        })?;

        if let Err(err) = self.git.checkout(&original, false).await {
            if let Err(cleanup) = self.git.delete_branch(branch).await {
                tracing::warn!("Could not delete temporary branch '{}': {}", branch, cleanup);
            }
            return Err(KaishakuError::from(err)
                .with_context(format!("Failed to return to original branch '{original}'")));
        }

        if let Err(err) = self.git.merge(branch).await {
            if let Err(abort_err) = self.git.merge_abort().await {
                tracing::warn!("git merge --abort failed: {}", abort_err);
            }
            if let Err(checkout_err) = self.git.checkout(branch, false).await {
                tracing::warn!("Could not check out '{}' after failed merge: {}", branch, checkout_err);
            }
            return Err(KaishakuError::from(err)
                .with_code(ErrorCode::EXEC_MERGE_FAILED)
                .with_context(format!(
                    "Failed to merge '{branch}' into '{original}'. The work is kept on branch '{branch}'; resolve the conflicts manually"
                )));
        }

        let mut warnings = Vec::new();
        if let Err(err) = self.git.delete_branch(branch).await {
            tracing::warn!("Failed to delete temporary branch '{}': {}", branch, err);
            warnings.push(format!("Failed to delete temporary branch '{branch}'"));
        }

        self.store
            .put(&session.name, RecordField::HeadRef, HEAD_SENTINEL)
            .await?;
        self.store.touch(&session.name).await?;

        Ok(SaveBackOutcome {
            name: session.name,
            branch: branch.to_string(),
            original_ref: original,
            warnings,
        })
    }

    /// Leave the active session and return to its original branch
    pub async fn exit(&self, mode: ExitMode) -> Result<ExitOutcome> {
        let session = self.active_session().await?;
        let plan = ExitPlan::resolve(mode, &self.config);

        let has_changes = match self.git.has_changes().await {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!("Could not read working tree status, assuming clean: {}", err);
                false
            }
        };

        if has_changes && plan.needs_confirmation(&self.config) {
            let confirmed = self
                .prompter
                .prompt_yes_no(DISCARD_PROMPT, false)
                .await
                .map_err(|err| {
                    KaishakuError::state_with_code(
                        ErrorCode::STORAGE_PROMPT_FAILED,
                        format!("Failed to read confirmation: {err}"),
                        Some(&session.name),
                    )
                })?;
            if !confirmed {
                return Ok(ExitOutcome::Aborted);
            }
        }

        let mut warnings = Vec::new();
        let changes = if !has_changes {
            if plan.save || plan.keep {
                ChangeDisposition::NothingToKeep
            } else {
                ChangeDisposition::Clean
            }
        } else if plan.save {
            let message = format!("[kaishaku] Save changes from session '{}'", session.name);
            self.git.stage_all().await?;
            self.git
                .commit(&message)
                .await
                .map_err(|err| KaishakuError::from(err).with_context("Failed to save changes"))?;
            ChangeDisposition::Saved
        } else if plan.keep {
            let message = format!("kaishaku: auto-stash from session '{}'", session.name);
            match self.git.stash_push(&message).await {
                Ok(()) => ChangeDisposition::Stashed,
                Err(err) => {
                    tracing::warn!("Stash failed: {}", err);
                    warnings.push(format!("{err}"));
                    warnings.push("Continuing without stashing changes.".to_string());
                    ChangeDisposition::StashFailed
                }
            }
        } else {
            self.git
                .reset_hard()
                .await
                .map_err(|err| KaishakuError::from(err).with_context("Failed to discard changes"))?;
            ChangeDisposition::Discarded
        };

        self.git
            .checkout(&session.original_ref, false)
            .await
            .map_err(|err| {
                KaishakuError::from(err).with_context(format!(
                    "Failed to return to branch '{}'",
                    session.original_ref
                ))
            })?;
        self.active.clear().await?;

        Ok(ExitOutcome::Exited {
            name: session.name,
            original_ref: session.original_ref,
            changes,
            warnings,
        })
    }

    /// Discard a session entirely, healthy or not
    pub async fn abort(&self, name: Option<&str>) -> Result<AbortOutcome> {
        if !self.store.root_exists().await {
            return Err(KaishakuError::no_sessions());
        }

        let pointer = self.active.get().await?;
        let name = match name {
            Some(name) => name.to_string(),
            None => pointer.clone().ok_or_else(|| {
                KaishakuError::state_with_code(
                    ErrorCode::STATE_NO_ACTIVE_SESSION,
                    "No active session to abort.",
                    None,
                )
            })?,
        };
        validate_session_name(&name)?;

        let is_active = pointer.as_deref() == Some(name.as_str());
        let mut warnings = Vec::new();

        let Some(entry) = self.registry.inspect(&name).await? else {
            if is_active {
                self.active.clear().await?;
                warnings.push(format!(
                    "Session '{name}' had no records; cleared the active pointer."
                ));
                return Ok(AbortOutcome {
                    name,
                    returned_to: None,
                    removed: false,
                    warnings,
                });
            }
            return Err(KaishakuError::session_not_found(&name));
        };

        let mut returned_to = None;
        if is_active {
            match entry.records.original_ref.as_deref() {
                Some(original) => {
                    self.git.checkout(original, false).await.map_err(|err| {
                        KaishakuError::from(err).with_context(format!(
                            "Failed to return to original branch '{original}'"
                        ))
                    })?;
                    returned_to = Some(original.to_string());
                }
                None => {
                    tracing::warn!("Original branch of '{}' is unknown", name);
                    warnings.push(format!(
                        "Original branch of session '{name}' is unknown; staying on the current commit."
                    ));
                }
            }
            self.active.clear().await?;
        }

        self.store.remove_session(&name).await?;

        Ok(AbortOutcome {
            name,
            returned_to,
            removed: true,
            warnings,
        })
    }

    /// Reactivate an inactive session, recreating its original branch if it
    /// has disappeared
    pub async fn recover(&self, name: &str) -> Result<RecoverOutcome> {
        if !self.store.root_exists().await {
            return Err(KaishakuError::no_sessions());
        }
        validate_session_name(name)?;

        let entry = self
            .registry
            .inspect(name)
            .await?
            .ok_or_else(|| KaishakuError::session_not_found(name))?;

        if self.active.is_active(name).await? {
            return Err(KaishakuError::session_active(
                name,
                format!("Session '{name}' is already active."),
            ));
        }

        let Some(session) = entry.session() else {
            return Err(KaishakuError::corruption(
                ErrorCode::CORRUPTION_UNRECOVERABLE,
                name,
                format!("{} and cannot be recovered", entry.health.describe()),
            ));
        };

        let mut warnings = Vec::new();
        let mut recreated_branch = None;
        if !self.git.ref_exists(&session.original_ref).await {
            tracing::warn!("Original branch '{}' not found", session.original_ref);
            warnings.push(format!(
                "Original branch '{}' not found. Creating new branch.",
                session.original_ref
            ));
            self.git
                .create_branch(&session.original_ref)
                .await
                .map_err(|err| {
                    KaishakuError::from(err).with_context(format!(
                        "Failed to create branch '{}'",
                        session.original_ref
                    ))
                })?;
            recreated_branch = Some(session.original_ref.clone());
        }

        self.activate(name, &session.head_ref).await?;

        Ok(RecoverOutcome {
            name: session.name,
            recreated_branch,
            warnings,
        })
    }

    pub async fn rename(&self, old: &str, new: &str) -> Result<RenameOutcome> {
        if !self.store.root_exists().await {
            return Err(KaishakuError::no_sessions());
        }
        validate_session_name(old)?;
        validate_session_name(new)?;

        if !self.store.session_exists(old).await? {
            return Err(KaishakuError::session_not_found(old));
        }
        let target = self.store.session_dir(new)?;
        if self.store.exists(&target).await {
            return Err(KaishakuError::session_exists(new));
        }
        if self.active.is_active(old).await? {
            return Err(KaishakuError::session_active(
                old,
                "Cannot rename active session. Exit the session first.",
            ));
        }

        self.store.rename_session(old, new).await?;

        Ok(RenameOutcome {
            old: old.to_string(),
            new: new.to_string(),
        })
    }

    /// Remove one inactive session, or sweep every inactive session
    pub async fn purge(&self, name: Option<&str>) -> Result<PurgeOutcome> {
        if !self.store.root_exists().await {
            return Ok(PurgeOutcome::NothingToPurge);
        }

        let pointer = self.active.get().await?;

        if let Some(name) = name {
            validate_session_name(name)?;
            if pointer.as_deref() == Some(name) {
                return Err(KaishakuError::session_active(
                    name,
                    format!("Cannot purge active session '{name}'. Exit the session first."),
                ));
            }
            if !self.store.session_exists(name).await? {
                return Err(KaishakuError::session_not_found(name));
            }
            self.store.remove_session(name).await?;
            return Ok(PurgeOutcome::Removed(name.to_string()));
        }

        let mut removed = 0;
        let mut skipped_active = None;
        let mut warnings = Vec::new();
        for session in self.store.session_names().await? {
            if pointer.as_deref() == Some(session.as_str()) {
                skipped_active = Some(session);
                continue;
            }
            match self.store.remove_session(&session).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!("Failed to purge session '{}': {}", session, err);
                    warnings.push(format!("Failed to purge session '{session}': {err}"));
                }
            }
        }

        Ok(PurgeOutcome::Swept {
            removed,
            skipped_active,
            warnings,
        })
    }

    /// Describe the active session; having none is not an error
    pub async fn status(&self) -> Result<StatusReport> {
        let mut report = StatusReport {
            active: None,
            dangling_active: None,
            config: self.config,
        };

        match self.registry.active_status().await? {
            ActiveStatus::Inactive => {}
            ActiveStatus::Dangling(name) => report.dangling_active = Some(name),
            ActiveStatus::Active(entry) => {
                report.active = Some(self.active_report(entry).await);
            }
        }

        Ok(report)
    }

    pub async fn list(&self) -> Result<SessionListing> {
        self.registry.summaries().await
    }

    async fn active_report(&self, entry: SessionEntry) -> ActiveSessionReport {
        let current_head = match self.git.last_commit().await {
            Ok(line) if !line.is_empty() => Some(line),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("Could not read the current commit: {}", err);
                None
            }
        };
        let changes = self.git.short_status().await.unwrap_or_else(|err| {
            tracing::warn!("Could not read working tree status: {}", err);
            Vec::new()
        });

        ActiveSessionReport {
            last_modified: format_timestamp(entry.records.timestamp.as_deref()),
            health: entry.health,
            original_ref: entry.records.original_ref,
            head_ref: entry.records.head_ref,
            description: entry.records.description,
            name: entry.name,
            current_head,
            changes,
        }
    }

    /// The active session, which must exist and be well-formed
    async fn active_session(&self) -> Result<Session> {
        match self.registry.active_status().await? {
            ActiveStatus::Inactive => Err(KaishakuError::no_active_session()),
            ActiveStatus::Dangling(name) => Err(KaishakuError::corruption(
                ErrorCode::CORRUPTION_DANGLING_ACTIVE,
                &name,
                "it is marked active but its records are gone",
            )),
            ActiveStatus::Active(entry) => entry.session().ok_or_else(|| corruption_error(&entry)),
        }
    }

    /// Point at `name`, check out its head and stamp it; a failed checkout
    /// restores the previous pointer and leaves the timestamp alone
    async fn activate(&self, name: &str, head_ref: &HeadRef) -> Result<()> {
        if let HeadRef::Commit(commit) = head_ref {
            if !self.git.ref_exists(commit).await {
                return Err(KaishakuError::state_with_code(
                    ErrorCode::STATE_REF_MISSING,
                    format!("Commit '{commit}' of session '{name}' no longer exists."),
                    Some(name),
                ));
            }
        }

        let previous = self.active.get().await?;
        self.active.set(name).await?;

        let checkout = match head_ref {
            HeadRef::Commit(commit) => self.git.checkout(commit, true).await,
            HeadRef::Promoted => self.git.checkout(HEAD_SENTINEL, false).await,
        };

        if let Err(err) = checkout {
            self.restore_pointer(previous.as_deref()).await;
            return Err(KaishakuError::from(err)
                .with_context(format!("Failed to check out session '{name}'")));
        }
        self.store.touch(name).await?;

        tracing::debug!("Activated session '{}' at {}", name, head_ref);
        Ok(())
    }

    async fn write_new_records(&self, name: &str, original_ref: &str, commit: &str) -> Result<()> {
        self.store.create_session_dir(name).await?;
        self.store
            .put(name, RecordField::OriginalRef, original_ref)
            .await?;
        self.store.put(name, RecordField::HeadRef, commit).await?;
        self.store.touch(name).await?;
        Ok(())
    }

    async fn discard_records(&self, name: &str) {
        if let Err(err) = self.store.remove_session(name).await {
            tracing::warn!("Could not remove records of '{}' during rollback: {}", name, err);
        }
    }

    async fn restore_pointer(&self, previous: Option<&str>) {
        if let Err(err) = self.active.restore(previous).await {
            tracing::warn!("Could not restore the active session pointer: {}", err);
        }
    }
}

fn corruption_error(entry: &SessionEntry) -> KaishakuError {
    let code = match entry.health {
        SessionHealth::MissingOriginalRef => ErrorCode::CORRUPTION_MISSING_ORIGINAL_REF,
        SessionHealth::MissingHeadRef => ErrorCode::CORRUPTION_MISSING_HEAD_REF,
        SessionHealth::MissingBoth | SessionHealth::WellFormed => {
            ErrorCode::CORRUPTION_MISSING_RECORDS
        }
    };
    KaishakuError::corruption(code, &entry.name, entry.health.describe())
}
