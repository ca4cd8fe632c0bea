use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Keyword that introduces a bot command in a chat message.
pub const TRIGGER_KEYWORD: &str = "gtm";

static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let keyword = regex::escape(TRIGGER_KEYWORD);
    Regex::new(&format!(
        r"{keyword}\s+(?P<verb>\w*)(?:\s+(?P<target>\S*))?"
    ))
    .expect("valid command pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Validate,
    Publish,
    Unrecognized,
}

impl Verb {
    fn parse(raw: &str) -> Self {
        match raw {
            "validate" => Verb::Validate,
            "publish" => Verb::Publish,
            _ => Verb::Unrecognized,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Validate => "validate",
            Verb::Publish => "publish",
            Verb::Unrecognized => "unrecognized",
        }
    }
}

/// A parsed `gtm <verb> <container>` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub verb: Verb,
    /// Container name; empty when the message stopped after the verb
    pub target: String,
}

/// Extract the command from free chat text.
///
/// Returns `None` when the keyword is absent. A keyword followed by a verb
/// but no container yields `Some` with an empty target.
pub fn parse_command(text: &str) -> Option<Command> {
    let captures = COMMAND_PATTERN.captures(text)?;
    let verb = captures.name("verb").map_or("", |m| m.as_str());
    let target = captures.name("target").map_or("", |m| m.as_str());
    Some(Command {
        verb: Verb::parse(verb),
        target: target.to_string(),
    })
}

/// Terminal state of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Usage,
    MissingAccount,
    ContainerNotFound { container: String },
    WorkspaceNotFound { container: String },
    Failed,
    ValidationFailed { findings: usize },
    Validated,
    Published { url: String },
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Validated | Outcome::Published { .. })
    }
}
