use crate::command::{CommandHandler, ScriptSubmitter};
use crate::router::Router;
use anyhow::{Context, Result};
use gtm_rules::RuleSet;
use gtm_tagmanager::{Fixture, HttpConnector, MemoryTagManager, SharedTagManager};
use std::path::PathBuf;
use std::sync::Arc;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub account_id: Option<String>,
    pub access_token: Option<String>,
    pub api_base: String,
    pub artifact_path: PathBuf,
    pub commit_script: PathBuf,
    pub workdir: PathBuf,
    pub bot_user_id: Option<String>,
    /// Serve Tag Manager data from a JSON fixture instead of the network.
    pub fixture: Option<PathBuf>,
}

impl BotConfig {
    /// The API handle is not connected here; the first command that needs it
    /// does that.
    pub fn tag_manager(&self) -> Result<SharedTagManager> {
        if let Some(path) = &self.fixture {
            let fixture = Fixture::load(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            log::debug!("Serving Tag Manager data from {}", path.display());
            return Ok(SharedTagManager::with_handle(Arc::new(
                MemoryTagManager::new(fixture),
            )));
        }
        Ok(SharedTagManager::new(HttpConnector::new(
            self.api_base.clone(),
            self.access_token.clone(),
        )))
    }

    pub fn handler(&self) -> Result<CommandHandler> {
        if self.account_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            log::warn!("GTM_ACCOUNT_ID is not set; commands will be refused");
        }
        Ok(CommandHandler::new(
            self.account_id.clone(),
            Arc::new(self.tag_manager()?),
            RuleSet::standard(),
            self.artifact_path.clone(),
            Arc::new(ScriptSubmitter::new(
                self.commit_script.clone(),
                self.workdir.clone(),
            )),
        ))
    }

    pub fn router(&self) -> Result<Router> {
        Ok(Router::new(
            self.bot_user_id.clone(),
            Arc::new(self.handler()?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> BotConfig {
        BotConfig {
            account_id: Some("1".to_string()),
            access_token: None,
            api_base: gtm_tagmanager::DEFAULT_BASE_URL.to_string(),
            artifact_path: PathBuf::from("gtm-config.json"),
            commit_script: PathBuf::from("github-commit.sh"),
            workdir: PathBuf::from("."),
            bot_user_id: None,
            fixture: None,
        }
    }

    #[tokio::test]
    async fn fixture_handle_is_ready_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        fs::write(&path, "{}").unwrap();

        let api = BotConfig {
            fixture: Some(path),
            ..config()
        }
        .tag_manager()
        .unwrap();
        assert!(api.get().await.is_ok());
    }

    #[test]
    fn unreadable_fixture_is_a_startup_error() {
        let err = BotConfig {
            fixture: Some(PathBuf::from("/nonexistent/fixture.json")),
            ..config()
        }
        .tag_manager()
        .err()
        .unwrap();
        assert!(err.to_string().contains("Failed to load fixture"));
    }

    #[tokio::test]
    async fn http_handle_without_token_fails_lazily() {
        let api = config().tag_manager().unwrap();
        assert!(!api.is_initialized());
        assert!(api.get().await.is_err());
        assert!(!api.is_initialized());
    }
}
