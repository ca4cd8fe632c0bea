use crate::command::error::DispatchError;
use gtm_rules::{RuleSet, ValidationResult};
use gtm_tagmanager::{
    account_path, container_path, workspace_path, Container, TagManagerApi, Workspace,
    WorkspaceSnapshot,
};

/// The container and default workspace a command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub container: Container,
    pub workspace: Workspace,
    pub workspace_path: String,
}

#[derive(Debug, Clone)]
pub struct Inspection {
    /// Fetched entities with bookkeeping fields stripped
    pub snapshot: WorkspaceSnapshot,
    pub result: ValidationResult,
}

pub(crate) struct ValidationService {
    rules: RuleSet,
}

impl ValidationService {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Resolve a container by exact name, then its default workspace.
    pub async fn resolve(
        &self,
        api: &dyn TagManagerApi,
        account_id: &str,
        container_name: &str,
    ) -> Result<Target, DispatchError> {
        let containers = api
            .list_containers(&account_path(account_id))
            .await
            .map_err(|source| DispatchError::Fetch {
                collection: "containers",
                source,
            })?;
        let container = containers
            .into_iter()
            .find(|c| c.name == container_name)
            .ok_or_else(|| DispatchError::ContainerNotFound(container_name.to_string()))?;

        let container_path = container_path(account_id, &container.container_id);
        let workspaces = api
            .list_workspaces(&container_path)
            .await
            .map_err(|source| DispatchError::Fetch {
                collection: "workspaces",
                source,
            })?;
        let workspace = workspaces
            .into_iter()
            .find(Workspace::is_default)
            .ok_or_else(|| DispatchError::WorkspaceNotFound {
                container: container.name.clone(),
                container_id: container.container_id.clone(),
            })?;

        log::debug!(
            "Resolved container {} ({}) to workspace {}",
            container.name,
            container.container_id,
            workspace.workspace_id
        );
        Ok(Target {
            workspace_path: workspace_path(&container_path, &workspace.workspace_id),
            container,
            workspace,
        })
    }

    /// Fetch variables, tags and triggers (in that order) and run the rules
    /// over every entity. Any failed fetch aborts the inspection.
    pub async fn inspect(
        &self,
        api: &dyn TagManagerApi,
        target: &Target,
    ) -> Result<Inspection, DispatchError> {
        let path = target.workspace_path.as_str();
        let variables = api
            .list_variables(path)
            .await
            .map_err(|source| DispatchError::Fetch {
                collection: "variables",
                source,
            })?;
        let tags = api
            .list_tags(path)
            .await
            .map_err(|source| DispatchError::Fetch {
                collection: "tags",
                source,
            })?;
        let triggers = api
            .list_triggers(path)
            .await
            .map_err(|source| DispatchError::Fetch {
                collection: "triggers",
                source,
            })?;

        let mut snapshot = WorkspaceSnapshot {
            variables,
            tags,
            triggers,
        };
        snapshot.strip_bookkeeping();
        if snapshot.is_empty() {
            log::warn!("Workspace {path} has no variables, tags or triggers");
        }

        let result = self.rules.check_snapshot(&snapshot);
        log::info!(
            "Checked {} entities in {}: {} finding(s)",
            snapshot.len(),
            path,
            result.findings.len()
        );
        Ok(Inspection { snapshot, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtm_tagmanager::{
        Bookkeeping, Collection, Fixture, MemoryTagManager, Variable, VariableKind,
    };

    const WS: &str = "accounts/1/containers/2/workspaces/3";

    fn fixture() -> Fixture {
        let mut variable = Variable::new("pageType", VariableKind::DataLayer);
        variable.bookkeeping = Bookkeeping {
            fingerprint: Some("123".to_string()),
            ..Bookkeeping::default()
        };
        Fixture::default()
            .container("accounts/1", Container::new("9", "other-site"))
            .container("accounts/1", Container::new("2", "acme-site"))
            .workspace("accounts/1/containers/2", Workspace::new("7", "Draft"))
            .workspace(
                "accounts/1/containers/2",
                Workspace::new("3", "Default Workspace"),
            )
            .variable(WS, variable)
            .tag(WS, gtm_tagmanager::Tag::new("GA", "ua"))
            .trigger(
                WS,
                gtm_tagmanager::Trigger::new("All Pages", Default::default()),
            )
    }

    #[tokio::test]
    async fn resolves_named_container_and_default_workspace() {
        let api = MemoryTagManager::new(fixture());
        let service = ValidationService::new(RuleSet::standard());
        let target = service.resolve(&api, "1", "acme-site").await.unwrap();
        assert_eq!(target.container.container_id, "2");
        assert_eq!(target.workspace.workspace_id, "3");
        assert_eq!(target.workspace_path, WS);
    }

    #[tokio::test]
    async fn missing_workspace_names_the_container() {
        let fixture = Fixture::default()
            .container("accounts/1", Container::new("2", "acme-site"))
            .workspace("accounts/1/containers/2", Workspace::new("7", "Draft"));
        let api = MemoryTagManager::new(fixture);
        let service = ValidationService::new(RuleSet::standard());
        let err = service.resolve(&api, "1", "acme-site").await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::WorkspaceNotFound { ref container, ref container_id }
                if container == "acme-site" && container_id == "2"
        ));
    }

    #[tokio::test]
    async fn inspect_fetches_in_order_and_strips_bookkeeping() {
        let api = MemoryTagManager::new(fixture());
        let service = ValidationService::new(RuleSet::standard());
        let target = service.resolve(&api, "1", "acme-site").await.unwrap();
        let inspection = service.inspect(&api, &target).await.unwrap();

        assert!(inspection.snapshot.variables[0].bookkeeping.is_empty());
        assert_eq!(inspection.result.findings.len(), 1);
        assert_eq!(inspection.result.findings[0].entity_name, "pageType");
        assert_eq!(
            api.calls()[2..].to_vec(),
            vec![
                format!("variables {WS}"),
                format!("tags {WS}"),
                format!("triggers {WS}"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_fetch_aborts_before_later_collections() {
        let api = MemoryTagManager::new(fixture()).failing(Collection::Tags);
        let service = ValidationService::new(RuleSet::standard());
        let target = service.resolve(&api, "1", "acme-site").await.unwrap();
        let err = service.inspect(&api, &target).await.unwrap_err();

        assert!(matches!(err, DispatchError::Fetch { collection: "tags", .. }));
        assert!(!api.calls().iter().any(|c| c.starts_with("triggers")));
    }
}
