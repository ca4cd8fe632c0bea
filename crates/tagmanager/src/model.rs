use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the workspace every command operates on.
pub const DEFAULT_WORKSPACE_NAME: &str = "Default Workspace";

/// A key/value parameter attached to tags, variables and trigger filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter type (`template`, `boolean`, `list`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub map: Vec<Parameter>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Parameter {
    /// Plain `template` parameter, the most common shape in a workspace
    #[must_use]
    pub fn template(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: Some("template".to_string()),
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

/// Fields the service uses for its own bookkeeping. They carry no
/// configuration meaning and change on every save, so they are dropped before
/// rules run and before anything is written to the artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookkeeping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_manager_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl Bookkeeping {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Variable type as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableKind {
    /// `v`: reads a key from the page data layer
    DataLayer,
    Other(String),
}

impl Default for VariableKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for VariableKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "v" => Self::DataLayer,
            _ => Self::Other(raw),
        }
    }
}

impl From<VariableKind> for String {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::DataLayer => "v".to_string(),
            VariableKind::Other(raw) => raw,
        }
    }
}

/// Trigger type as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerKind {
    CustomEvent,
    Other(String),
}

impl Default for TriggerKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for TriggerKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "customEvent" => Self::CustomEvent,
            _ => Self::Other(raw),
        }
    }
}

impl From<TriggerKind> for String {
    fn from(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::CustomEvent => "customEvent".to_string(),
            TriggerKind::Other(raw) => raw,
        }
    }
}

/// Trigger filter condition type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionKind {
    CssSelector,
    Other(String),
}

impl Default for ConditionKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ConditionKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "cssSelector" => Self::CssSelector,
            _ => Self::Other(raw),
        }
    }
}

impl From<ConditionKind> for String {
    fn from(kind: ConditionKind) -> Self {
        match kind {
            ConditionKind::CssSelector => "cssSelector".to_string(),
            ConditionKind::Other(raw) => raw,
        }
    }
}

/// A single trigger filter. Operands live in `parameter` under the keys
/// `arg0` (usually a variable reference) and `arg1` (the literal operand).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub kind: ConditionKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<Parameter>,
}

impl Condition {
    /// `{{Click Element}} matches CSS selector <selector>`
    #[must_use]
    pub fn css_selector(selector: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::CssSelector,
            parameter: vec![
                Parameter::template("arg0", "{{Click Element}}"),
                Parameter::template("arg1", selector),
            ],
        }
    }

    /// Values of every parameter with the given key, in service order
    pub fn arguments<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.parameter
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: VariableKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<Parameter>,

    #[serde(flatten)]
    pub bookkeeping: Bookkeeping,

    /// Every other field the service returned, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter.push(parameter);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default)]
    pub name: String,

    /// Tag template type (`ua`, `html`, `gaawe`, ...)
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<Parameter>,

    #[serde(flatten)]
    pub bookkeeping: Bookkeeping,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter.push(parameter);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: TriggerKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Condition>,

    #[serde(flatten)]
    pub bookkeeping: Bookkeeping,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trigger {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TriggerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filter(mut self, condition: Condition) -> Self {
        self.filter.push(condition);
        self
    }
}

/// Which collection an entity was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Variable,
    Tag,
    Trigger,
}

/// Borrowed view over any workspace entity.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Variable(&'a Variable),
    Tag(&'a Tag),
    Trigger(&'a Trigger),
}

impl<'a> EntityRef<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            EntityRef::Variable(v) => &v.name,
            EntityRef::Tag(t) => &t.name,
            EntityRef::Trigger(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    pub container_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl Container {
    #[must_use]
    pub fn new(container_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            name: name.into(),
            public_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub workspace_id: String,

    #[serde(default)]
    pub name: String,
}

impl Workspace {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_WORKSPACE_NAME
    }
}

#[must_use]
pub fn account_path(account_id: &str) -> String {
    format!("accounts/{account_id}")
}

#[must_use]
pub fn container_path(account_id: &str, container_id: &str) -> String {
    format!("accounts/{account_id}/containers/{container_id}")
}

#[must_use]
pub fn workspace_path(container_path: &str, workspace_id: &str) -> String {
    format!("{container_path}/workspaces/{workspace_id}")
}
