pub mod domain;
mod error;
pub mod replies;
mod services;

pub use domain::{parse_command, Command, Outcome, Verb, TRIGGER_KEYWORD};
pub use error::DispatchError;
pub use services::{
    branch_name, extract_pull_request_url, ChangeSubmitter, Inspection, PublishError,
    ScriptSubmitter, Target, PR_DELIMITER,
};

use crate::chat::ChatSink;
use gtm_rules::RuleSet;
use gtm_tagmanager::SharedTagManager;
use services::{PublishService, Services, ValidationService};
use std::path::PathBuf;
use std::sync::Arc;

/// Runs one chat command from parse result to final reply.
///
/// ```text
/// ValidateVerb -> ResolveAccount -> ResolveContainer -> ResolveWorkspace
///     -> RunValidation -> (Publish) -> Done
/// ```
///
/// Each step either advances or replies with one message and stops. The
/// handler keeps no per-command state, so concurrent commands only share the
/// API handle.
pub struct CommandHandler {
    account_id: Option<String>,
    api: Arc<SharedTagManager>,
    services: Services,
}

impl CommandHandler {
    pub fn new(
        account_id: Option<String>,
        api: Arc<SharedTagManager>,
        rules: RuleSet,
        artifact_path: PathBuf,
        submitter: Arc<dyn ChangeSubmitter>,
    ) -> Self {
        Self {
            account_id,
            api,
            services: Services {
                validation: ValidationService::new(rules),
                publish: PublishService::new(artifact_path, submitter),
            },
        }
    }

    pub async fn execute(&self, command: Option<Command>, sink: &dyn ChatSink) -> Outcome {
        match self.run(command, sink).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.is_collaborator() {
                    log::error!("Command failed: {err:#}");
                } else {
                    log::info!("Command stopped: {err}");
                }
                say(sink, &err.reply()).await;
                err.outcome()
            }
        }
    }

    async fn run(
        &self,
        command: Option<Command>,
        sink: &dyn ChatSink,
    ) -> Result<Outcome, DispatchError> {
        let command = match command {
            Some(command @ Command {
                verb: Verb::Validate | Verb::Publish,
                ..
            }) => command,
            Some(Command {
                verb: Verb::Unrecognized,
                ..
            })
            | None => return Err(DispatchError::UnknownVerb),
        };

        let account_id = self
            .account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(DispatchError::MissingAccount)?;

        log::debug!("Running {} for `{}`", command.verb.as_str(), command.target);
        let api = self.api.get().await.map_err(DispatchError::Connect)?;
        let validation = &self.services.validation;
        let target = validation
            .resolve(api.as_ref(), account_id, &command.target)
            .await?;

        say(
            sink,
            &replies::validating(
                &target.workspace.workspace_id,
                &target.container.container_id,
            ),
        )
        .await;

        let inspection = validation.inspect(api.as_ref(), &target).await?;
        if !inspection.result.passed() {
            say(sink, &inspection.result.report()).await;
            say(sink, replies::VALIDATION_FAILED).await;
            return Ok(Outcome::ValidationFailed {
                findings: inspection.result.findings.len(),
            });
        }
        say(sink, replies::VALIDATION_SUCCEEDED).await;

        match command.verb {
            Verb::Publish => {
                let url = self
                    .services
                    .publish
                    .publish(&target, &inspection.snapshot)
                    .await?;
                say(sink, &replies::published(&url)).await;
                Ok(Outcome::Published { url })
            }
            Verb::Validate | Verb::Unrecognized => Ok(Outcome::Validated),
        }
    }
}

async fn say(sink: &dyn ChatSink, text: &str) {
    if let Err(err) = sink.say(text).await {
        log::warn!("Failed to deliver reply: {err:#}");
    }
}
