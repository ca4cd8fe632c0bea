use crate::command::services::validation::Target;
use async_trait::async_trait;
use gtm_tagmanager::{TagManagerError, WorkspaceSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Marks the pull request URL in the commit script's stdout.
pub const PR_DELIMITER: &str = "@@@";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("could not encode artifact: {0}")]
    Encode(#[source] TagManagerError),

    #[error("could not write {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not start commit script: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("commit script exited with {}: {stderr}", exit_label(.code))]
    ScriptFailed { code: Option<i32>, stderr: String },

    #[error("commit script output has no `@@@` pull request link")]
    MissingDelimiter,
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// Commits the artifact on a new branch and opens a pull request.
#[async_trait]
pub trait ChangeSubmitter: Send + Sync {
    /// Returns the pull request URL
    async fn submit(&self, branch: &str, artifact: &Path) -> Result<String, PublishError>;
}

/// Runs the repository's commit script: `<shell> <script> <branch>`.
#[derive(Debug, Clone)]
pub struct ScriptSubmitter {
    pub shell: PathBuf,
    pub script: PathBuf,
    pub workdir: PathBuf,
}

impl ScriptSubmitter {
    pub fn new(script: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            shell: PathBuf::from("/bin/bash"),
            script: script.into(),
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl ChangeSubmitter for ScriptSubmitter {
    async fn submit(&self, branch: &str, _artifact: &Path) -> Result<String, PublishError> {
        log::info!(
            "Running {} {} {branch} in {}",
            self.shell.display(),
            self.script.display(),
            self.workdir.display()
        );
        let output = tokio::process::Command::new(&self.shell)
            .arg(&self.script)
            .arg(branch)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(PublishError::Spawn)?;

        if !output.status.success() {
            return Err(PublishError::ScriptFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        extract_pull_request_url(&stdout).ok_or(PublishError::MissingDelimiter)
    }
}

/// Second `@@@`-delimited segment of the script output, trimmed.
pub fn extract_pull_request_url(stdout: &str) -> Option<String> {
    let mut segments = stdout.split(PR_DELIMITER);
    segments.next()?;
    let url = segments.next()?.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Branch for one publish. Second granularity: two publishes of the same
/// workspace within one second collide, and the commit script decides what
/// happens then.
pub fn branch_name(container_name: &str, workspace_id: &str, unix_seconds: u64) -> String {
    format!("{container_name}-{workspace_id}-{unix_seconds}")
}

pub(crate) struct PublishService {
    artifact_path: PathBuf,
    submitter: Arc<dyn ChangeSubmitter>,
}

impl PublishService {
    pub fn new(artifact_path: PathBuf, submitter: Arc<dyn ChangeSubmitter>) -> Self {
        Self {
            artifact_path,
            submitter,
        }
    }

    /// Write the artifact (replacing any previous one) and submit it.
    /// The file stays on disk when submission fails; rerunning overwrites it.
    pub async fn publish(
        &self,
        target: &Target,
        snapshot: &WorkspaceSnapshot,
    ) -> Result<String, PublishError> {
        let encoded = snapshot.to_artifact_json().map_err(PublishError::Encode)?;
        tokio::fs::write(&self.artifact_path, encoded)
            .await
            .map_err(|source| PublishError::Artifact {
                path: self.artifact_path.display().to_string(),
                source,
            })?;

        let branch = branch_name(
            &target.container.name,
            &target.workspace.workspace_id,
            unix_seconds(),
        );
        let url = self.submitter.submit(&branch, &self.artifact_path).await?;
        log::info!("Published {} on {branch}: {url}", target.container.name);
        Ok(url)
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
