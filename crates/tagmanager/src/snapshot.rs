use crate::error::Result;
use crate::model::{Container, EntityRef, Tag, Trigger, Variable, Workspace};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

/// One page of a list call. The same envelopes are used to decode API
/// responses and to encode the published artifact.
pub trait ListPage {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);

    fn from_items(items: Vec<Self::Item>) -> Self;
}

macro_rules! list_page {
    ($name:ident, $field:ident, $item:ty) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            pub $field: Vec<$item>,

            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub next_page_token: Option<String>,
        }

        impl ListPage for $name {
            type Item = $item;

            fn into_parts(self) -> (Vec<$item>, Option<String>) {
                (self.$field, self.next_page_token)
            }

            fn from_items(items: Vec<$item>) -> Self {
                Self {
                    $field: items,
                    next_page_token: None,
                }
            }
        }
    };
}

list_page!(ContainerList, container, Container);
list_page!(WorkspaceList, workspace, Workspace);
list_page!(VariableList, variable, Variable);
list_page!(TagList, tag, Tag);
list_page!(TriggerList, trigger, Trigger);

/// The three entity collections of one workspace, as fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceSnapshot {
    pub variables: Vec<Variable>,
    pub tags: Vec<Tag>,
    pub triggers: Vec<Trigger>,
}

impl WorkspaceSnapshot {
    /// Drop the service bookkeeping fields from every entity
    pub fn strip_bookkeeping(&mut self) {
        for variable in &mut self.variables {
            variable.bookkeeping.clear();
        }
        for tag in &mut self.tags {
            tag.bookkeeping.clear();
        }
        for trigger in &mut self.triggers {
            trigger.bookkeeping.clear();
        }
    }

    /// Entities in fetch order: variables, then tags, then triggers
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.variables
            .iter()
            .map(EntityRef::Variable)
            .chain(self.tags.iter().map(EntityRef::Tag))
            .chain(self.triggers.iter().map(EntityRef::Trigger))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len() + self.tags.len() + self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode the published artifact: a positional array
    /// `[triggers, tags, variables]`, each element a list envelope,
    /// indented with four spaces. Consumers index into it by position.
    pub fn to_artifact_json(&self) -> Result<String> {
        let artifact = (
            TriggerList::from_items(self.triggers.clone()),
            TagList::from_items(self.tags.clone()),
            VariableList::from_items(self.variables.clone()),
        );

        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        artifact.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|err| crate::TagManagerError::Other(err.to_string()))
    }
}
