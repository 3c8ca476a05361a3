//! Runtime initialization and setup
//!
//! Locates the repository, loads the tool configuration once and wires the
//! session lifecycle to the git gateway.

use std::sync::Arc;

use crate::app::{config::AppConfig, logging::init_logging};
use crate::config::{ConfigStore, ToolConfig};
use crate::error::{ErrorCode, KaishakuError, Result};
use crate::interaction::UserPrompter;
use crate::session::SessionLifecycle;
use crate::storage::store_root;
use crate::subprocess::{GitRunner, SubprocessManager};
use tracing::debug;

/// Initialize the application with proper logging
pub fn initialize_app(config: &AppConfig) {
    init_logging(config);
}

/// Everything one command invocation needs
pub struct SessionContext {
    pub lifecycle: SessionLifecycle,
    pub config_store: ConfigStore,
}

impl SessionContext {
    pub async fn build(
        app: &AppConfig,
        subprocess: &SubprocessManager,
        prompter: Arc<dyn UserPrompter>,
    ) -> Result<Self> {
        let git: Arc<dyn GitRunner> = Arc::new(subprocess.git(&app.working_dir));

        let git_dir = git.git_dir().await.map_err(|err| {
            KaishakuError::config_with_code(
                ErrorCode::CONFIG_NOT_A_REPOSITORY,
                format!("Not a git repository: {err}"),
            )
        })?;
        let root = store_root(&app.working_dir, &git_dir);
        debug!("Session store at {}", root.display());

        let config_store = ConfigStore::new(Arc::clone(&git));
        let config: ToolConfig = config_store.load().await;

        Ok(Self {
            lifecycle: SessionLifecycle::new(&root, git, prompter, config),
            config_store,
        })
    }
}
