//! Chat reply texts. The emoji shortcodes and markup are part of what users
//! see and search for in channel history, keep them stable.

use gtm_tagmanager::DEFAULT_WORKSPACE_NAME;

pub const USAGE: &str = "There are two commands available, `publish` and `validate`. For example, '@' the bot and try `gtm validate ${name_of_container}`";

pub const MISSING_ACCOUNT: &str =
    ":x: The `GTM_ACCOUNT_ID` has not been set, please contact tech support";

pub const VALIDATION_FAILED: &str =
    ":crying_cat_face: Validation Failed! Please fix the above errors and try again...";

pub const VALIDATION_SUCCEEDED: &str = ":thumbsup: Validation Succeeded!";

pub const API_UNAVAILABLE: &str =
    ":x: Could not connect to the Tag Manager API, please contact tech support";

pub fn container_not_found(container: &str) -> String {
    format!(
        ":crying_cat_face: Could not find a container with name `{container}`! Please double check that a container with that name exists"
    )
}

pub fn workspace_not_found(container: &str, container_id: &str) -> String {
    format!(
        "There was an error getting the default workspace ID: Workspace ID for '{DEFAULT_WORKSPACE_NAME}' could not be found in container `{container}` (ID {container_id})"
    )
}

pub fn validating(workspace_id: &str, container_id: &str) -> String {
    format!(":ram: validating workspace #{workspace_id} for container with ID {container_id}")
}

pub fn fetch_failed(collection: &str) -> String {
    format!(
        ":x: Could not fetch {collection} from Tag Manager, check the bot logs for details"
    )
}

pub fn publish_failed(reason: &str) -> String {
    format!(":x: Publish failed: {reason}")
}

pub fn published(url: &str) -> String {
    format!(":shipit: Publish success! Click below to create a PR:\n\n {url}")
}
