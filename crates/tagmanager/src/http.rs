use crate::api::TagManagerApi;
use crate::error::{Result, TagManagerError};
use crate::model::{Container, Tag, Trigger, Variable, Workspace};
use crate::shared::Connect;
use crate::snapshot::{
    ContainerList, ListPage, TagList, TriggerList, VariableList, WorkspaceList,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://tagmanager.googleapis.com/tagmanager/v2/";

/// Tag Manager v2 REST client authenticated with a bearer access token.
pub struct HttpTagManager {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpTagManager {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gtm-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            client,
            base_url,
            access_token: access_token.into(),
        })
    }

    fn collection_url(&self, parent: &str, collection: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            parent.trim_matches('/'),
            collection
        )
    }

    async fn list_all<P>(&self, parent: &str, collection: &str) -> Result<Vec<P::Item>>
    where
        P: ListPage + DeserializeOwned,
    {
        let url = self.collection_url(parent, collection);
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TagManagerError::Status {
                    status: status.as_u16(),
                    url,
                    body,
                });
            }

            let bytes = response.bytes().await?;
            let page: P = serde_json::from_slice(&bytes)?;
            let (mut batch, next) = page.into_parts();
            items.append(&mut batch);

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("GET {url}: {} item(s)", items.len());
        Ok(items)
    }
}

#[async_trait]
impl TagManagerApi for HttpTagManager {
    async fn list_containers(&self, account_path: &str) -> Result<Vec<Container>> {
        self.list_all::<ContainerList>(account_path, "containers")
            .await
    }

    async fn list_workspaces(&self, container_path: &str) -> Result<Vec<Workspace>> {
        self.list_all::<WorkspaceList>(container_path, "workspaces")
            .await
    }

    async fn list_variables(&self, workspace_path: &str) -> Result<Vec<Variable>> {
        self.list_all::<VariableList>(workspace_path, "variables")
            .await
    }

    async fn list_tags(&self, workspace_path: &str) -> Result<Vec<Tag>> {
        self.list_all::<TagList>(workspace_path, "tags").await
    }

    async fn list_triggers(&self, workspace_path: &str) -> Result<Vec<Trigger>> {
        self.list_all::<TriggerList>(workspace_path, "triggers")
            .await
    }
}

/// Builds an [`HttpTagManager`] on first use.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl HttpConnector {
    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token,
        }
    }
}

#[async_trait]
impl Connect for HttpConnector {
    async fn connect(&self) -> Result<Arc<dyn TagManagerApi>> {
        let token = self
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                TagManagerError::Auth("GTM_ACCESS_TOKEN is not set".to_string())
            })?;
        let api = HttpTagManager::new(&self.base_url, token)?;
        Ok(Arc::new(api))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_joins_base_and_parent() {
        let api = HttpTagManager::new("https://example.test/tagmanager/v2", "token").unwrap();
        assert_eq!(
            api.collection_url("accounts/1/containers/2", "workspaces"),
            "https://example.test/tagmanager/v2/accounts/1/containers/2/workspaces"
        );
        assert_eq!(
            api.collection_url("/accounts/1/", "containers"),
            "https://example.test/tagmanager/v2/accounts/1/containers"
        );
    }

    #[tokio::test]
    async fn connector_requires_access_token() {
        let err = HttpConnector::new(DEFAULT_BASE_URL, Some("  ".to_string()))
            .connect()
            .await
            .err()
            .expect("blank token must be rejected");
        assert!(matches!(err, TagManagerError::Auth(_)));

        assert!(HttpConnector::new(DEFAULT_BASE_URL, Some("ya29.token".to_string()))
            .connect()
            .await
            .is_ok());
    }
}
