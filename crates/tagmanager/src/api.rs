use crate::error::Result;
use crate::model::{Container, Tag, Trigger, Variable, Workspace};
use async_trait::async_trait;

/// Read-only surface of the Tag Manager service used by the bot.
///
/// Every method takes the fully-qualified parent path
/// (`accounts/{a}`, `accounts/{a}/containers/{c}`, ...) and returns the
/// complete collection in service order.
#[async_trait]
pub trait TagManagerApi: Send + Sync {
    async fn list_containers(&self, account_path: &str) -> Result<Vec<Container>>;

    async fn list_workspaces(&self, container_path: &str) -> Result<Vec<Workspace>>;

    async fn list_variables(&self, workspace_path: &str) -> Result<Vec<Variable>>;

    async fn list_tags(&self, workspace_path: &str) -> Result<Vec<Tag>>;

    async fn list_triggers(&self, workspace_path: &str) -> Result<Vec<Trigger>>;
}
