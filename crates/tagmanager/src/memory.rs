use crate::api::TagManagerApi;
use crate::error::{Result, TagManagerError};
use crate::model::{Container, Tag, Trigger, Variable, Workspace};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

/// A static account tree, keyed by parent path exactly as the API is.
///
/// ```json
/// {
///   "containers": { "accounts/1": [{ "containerId": "2", "name": "acme-site" }] },
///   "workspaces": { "accounts/1/containers/2": [{ "workspaceId": "3", "name": "Default Workspace" }] },
///   "variables":  { "accounts/1/containers/2/workspaces/3": [] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub containers: BTreeMap<String, Vec<Container>>,
    #[serde(default)]
    pub workspaces: BTreeMap<String, Vec<Workspace>>,
    #[serde(default)]
    pub variables: BTreeMap<String, Vec<Variable>>,
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<Tag>>,
    #[serde(default)]
    pub triggers: BTreeMap<String, Vec<Trigger>>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    #[must_use]
    pub fn container(mut self, account_path: &str, container: Container) -> Self {
        self.containers
            .entry(account_path.to_string())
            .or_default()
            .push(container);
        self
    }

    #[must_use]
    pub fn workspace(mut self, container_path: &str, workspace: Workspace) -> Self {
        self.workspaces
            .entry(container_path.to_string())
            .or_default()
            .push(workspace);
        self
    }

    #[must_use]
    pub fn variable(mut self, workspace_path: &str, variable: Variable) -> Self {
        self.variables
            .entry(workspace_path.to_string())
            .or_default()
            .push(variable);
        self
    }

    #[must_use]
    pub fn tag(mut self, workspace_path: &str, tag: Tag) -> Self {
        self.tags
            .entry(workspace_path.to_string())
            .or_default()
            .push(tag);
        self
    }

    #[must_use]
    pub fn trigger(mut self, workspace_path: &str, trigger: Trigger) -> Self {
        self.triggers
            .entry(workspace_path.to_string())
            .or_default()
            .push(trigger);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Containers,
    Workspaces,
    Variables,
    Tags,
    Triggers,
}

impl Collection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Containers => "containers",
            Collection::Workspaces => "workspaces",
            Collection::Variables => "variables",
            Collection::Tags => "tags",
            Collection::Triggers => "triggers",
        }
    }
}

/// In-process [`TagManagerApi`] backed by a [`Fixture`]. Records every call.
pub struct MemoryTagManager {
    fixture: Fixture,
    failing: HashSet<Collection>,
    calls: Mutex<Vec<String>>,
}

impl MemoryTagManager {
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every list call on `collection` fail with a 403
    #[must_use]
    pub fn failing(mut self, collection: Collection) -> Self {
        self.failing.insert(collection);
        self
    }

    /// `"<collection> <parent>"` for every call made so far
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    fn record(&self, collection: Collection, parent: &str) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{} {parent}", collection.as_str()));
        }
        if self.failing.contains(&collection) {
            return Err(TagManagerError::Status {
                status: 403,
                url: format!("{parent}/{}", collection.as_str()),
                body: "The caller does not have permission".to_string(),
            });
        }
        Ok(())
    }

    fn lookup<T: Clone>(
        &self,
        collection: Collection,
        source: &BTreeMap<String, Vec<T>>,
        parent: &str,
    ) -> Result<Vec<T>> {
        self.record(collection, parent)?;
        source
            .get(parent)
            .cloned()
            .ok_or_else(|| TagManagerError::NotFound(parent.to_string()))
    }

    /// Entity collections of a known workspace default to empty, as the
    /// service answers an empty workspace with an empty list.
    fn lookup_entities<T: Clone>(
        &self,
        collection: Collection,
        source: &BTreeMap<String, Vec<T>>,
        workspace_path: &str,
    ) -> Result<Vec<T>> {
        self.record(collection, workspace_path)?;
        match source.get(workspace_path) {
            Some(items) => Ok(items.clone()),
            None if self.has_workspace(workspace_path) => Ok(Vec::new()),
            None => Err(TagManagerError::NotFound(workspace_path.to_string())),
        }
    }

    fn has_workspace(&self, workspace_path: &str) -> bool {
        workspace_path
            .rsplit_once("/workspaces/")
            .and_then(|(container_path, id)| {
                self.fixture
                    .workspaces
                    .get(container_path)
                    .map(|workspaces| workspaces.iter().any(|w| w.workspace_id == id))
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl TagManagerApi for MemoryTagManager {
    async fn list_containers(&self, account_path: &str) -> Result<Vec<Container>> {
        self.lookup(Collection::Containers, &self.fixture.containers, account_path)
    }

    async fn list_workspaces(&self, container_path: &str) -> Result<Vec<Workspace>> {
        self.lookup(Collection::Workspaces, &self.fixture.workspaces, container_path)
    }

    async fn list_variables(&self, workspace_path: &str) -> Result<Vec<Variable>> {
        self.lookup_entities(Collection::Variables, &self.fixture.variables, workspace_path)
    }

    async fn list_tags(&self, workspace_path: &str) -> Result<Vec<Tag>> {
        self.lookup_entities(Collection::Tags, &self.fixture.tags, workspace_path)
    }

    async fn list_triggers(&self, workspace_path: &str) -> Result<Vec<Trigger>> {
        self.lookup_entities(Collection::Triggers, &self.fixture.triggers, workspace_path)
    }
}
