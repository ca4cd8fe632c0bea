use crate::command::domain::Outcome;
use crate::command::replies;
use crate::command::services::PublishError;
use gtm_tagmanager::TagManagerError;
use thiserror::Error;

/// Why a command stopped before reaching its normal end.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unrecognized command")]
    UnknownVerb,

    #[error("GTM_ACCOUNT_ID is not set")]
    MissingAccount,

    #[error("no container named `{0}`")]
    ContainerNotFound(String),

    #[error("container `{container}` ({container_id}) has no default workspace")]
    WorkspaceNotFound {
        container: String,
        container_id: String,
    },

    #[error("failed to initialize Tag Manager API: {0}")]
    Connect(#[source] TagManagerError),

    #[error("failed to list {collection}: {source}")]
    Fetch {
        collection: &'static str,
        #[source]
        source: TagManagerError,
    },

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

impl DispatchError {
    /// Collaborator failures are unexpected and get logged as errors; the
    /// rest are user input problems.
    #[must_use]
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            DispatchError::Connect(_) | DispatchError::Fetch { .. } | DispatchError::Publish(_)
        )
    }

    #[must_use]
    pub fn reply(&self) -> String {
        match self {
            DispatchError::UnknownVerb => replies::USAGE.to_string(),
            DispatchError::MissingAccount => replies::MISSING_ACCOUNT.to_string(),
            DispatchError::ContainerNotFound(name) => replies::container_not_found(name),
            DispatchError::WorkspaceNotFound {
                container,
                container_id,
            } => replies::workspace_not_found(container, container_id),
            DispatchError::Connect(_) => replies::API_UNAVAILABLE.to_string(),
            DispatchError::Fetch { collection, .. } => replies::fetch_failed(collection),
            DispatchError::Publish(err) => replies::publish_failed(&err.to_string()),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            DispatchError::UnknownVerb => Outcome::Usage,
            DispatchError::MissingAccount => Outcome::MissingAccount,
            DispatchError::ContainerNotFound(name) => Outcome::ContainerNotFound {
                container: name.clone(),
            },
            DispatchError::WorkspaceNotFound { container, .. } => Outcome::WorkspaceNotFound {
                container: container.clone(),
            },
            DispatchError::Connect(_)
            | DispatchError::Fetch { .. }
            | DispatchError::Publish(_) => Outcome::Failed,
        }
    }
}
