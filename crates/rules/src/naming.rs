use crate::finding::Finding;
use crate::rule::Rule;
use gtm_tagmanager::{Trigger, TriggerKind, Variable, VariableKind};

pub const DATA_LAYER_PREFIX: &str = "Data Layer - ";
pub const CUSTOM_EVENT_PREFIX: &str = "Custom Event - ";

/// Data layer variables must be named `Data Layer - ...`.
pub struct DataLayerPrefix;

impl Rule<Variable> for DataLayerPrefix {
    fn id(&self) -> &'static str {
        "data-layer-prefix"
    }

    fn evaluate(&self, variable: &Variable) -> Option<Finding> {
        match &variable.kind {
            VariableKind::DataLayer if !variable.name.starts_with(DATA_LAYER_PREFIX) => {
                Some(Finding::new(
                    &variable.name,
                    format!(
                        "Variable `{}` failed validation, all Data Layer variables must start with the prefix: `{}`",
                        variable.name, DATA_LAYER_PREFIX
                    ),
                ))
            }
            VariableKind::DataLayer | VariableKind::Other(_) => None,
        }
    }
}

/// Custom event triggers must be named `Custom Event - ...`.
pub struct CustomEventPrefix;

impl Rule<Trigger> for CustomEventPrefix {
    fn id(&self) -> &'static str {
        "custom-event-prefix"
    }

    fn evaluate(&self, trigger: &Trigger) -> Option<Finding> {
        match &trigger.kind {
            TriggerKind::CustomEvent if !trigger.name.starts_with(CUSTOM_EVENT_PREFIX) => {
                Some(Finding::new(
                    &trigger.name,
                    format!(
                        "Trigger `{}` failed validation, all Custom Event trigger names must start with the prefix: `{}`",
                        trigger.name, CUSTOM_EVENT_PREFIX
                    ),
                ))
            }
            TriggerKind::CustomEvent | TriggerKind::Other(_) => None,
        }
    }
}
