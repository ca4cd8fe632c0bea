use crate::finding::{Finding, ValidationResult};
use crate::{naming, selectors, tags};
use gtm_tagmanager::{EntityKind, EntityRef, Tag, Trigger, Variable, WorkspaceSnapshot};

/// A pure check over one entity kind.
pub trait Rule<E>: Send + Sync {
    fn id(&self) -> &'static str;

    fn evaluate(&self, entity: &E) -> Option<Finding>;
}

/// Ordered rules per entity kind.
///
/// Every rule registered for a kind runs against every entity of that kind;
/// a finding from one rule never stops the next.
pub struct RuleSet {
    variables: Vec<Box<dyn Rule<Variable>>>,
    tags: Vec<Box<dyn Rule<Tag>>>,
    triggers: Vec<Box<dyn Rule<Trigger>>>,
}

impl RuleSet {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            variables: Vec::new(),
            tags: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Workspace conventions enforced before publishing
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_variable_rule(naming::DataLayerPrefix)
            .with_tag_rule(tags::EventParamFormat)
            .with_trigger_rule(naming::CustomEventPrefix)
            .with_trigger_rule(selectors::CssSelectorConvention)
    }

    #[must_use]
    pub fn with_variable_rule(mut self, rule: impl Rule<Variable> + 'static) -> Self {
        self.variables.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn with_tag_rule(mut self, rule: impl Rule<Tag> + 'static) -> Self {
        self.tags.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn with_trigger_rule(mut self, rule: impl Rule<Trigger> + 'static) -> Self {
        self.triggers.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn rule_ids(&self, kind: EntityKind) -> Vec<&'static str> {
        match kind {
            EntityKind::Variable => self.variables.iter().map(|r| r.id()).collect(),
            EntityKind::Tag => self.tags.iter().map(|r| r.id()).collect(),
            EntityKind::Trigger => self.triggers.iter().map(|r| r.id()).collect(),
        }
    }

    #[must_use]
    pub fn check(&self, entity: EntityRef<'_>) -> Vec<Finding> {
        match entity {
            EntityRef::Variable(variable) => run(&self.variables, variable),
            EntityRef::Tag(tag) => run(&self.tags, tag),
            EntityRef::Trigger(trigger) => run(&self.triggers, trigger),
        }
    }

    /// Check every entity of the snapshot, variables first, then tags, then triggers
    #[must_use]
    pub fn check_snapshot(&self, snapshot: &WorkspaceSnapshot) -> ValidationResult {
        snapshot
            .entities()
            .flat_map(|entity| self.check(entity))
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn run<E>(rules: &[Box<dyn Rule<E>>], entity: &E) -> Vec<Finding> {
    rules
        .iter()
        .filter_map(|rule| rule.evaluate(entity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtm_tagmanager::{Condition, Parameter, TriggerKind, VariableKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_registration_order() {
        let rules = RuleSet::standard();
        assert_eq!(rules.rule_ids(EntityKind::Variable), vec!["data-layer-prefix"]);
        assert_eq!(rules.rule_ids(EntityKind::Tag), vec!["event-param-format"]);
        assert_eq!(
            rules.rule_ids(EntityKind::Trigger),
            vec!["custom-event-prefix", "css-selector-convention"]
        );
    }

    #[test]
    fn trigger_rules_do_not_short_circuit() {
        let trigger = Trigger::new("signup", TriggerKind::CustomEvent)
            .with_filter(Condition::css_selector("#signup"));
        let findings = RuleSet::standard().check(EntityRef::Trigger(&trigger));

        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("Custom Event - "));
        assert!(findings[1].message.contains("#signup"));
    }

    #[test]
    fn snapshot_findings_follow_collection_then_rule_order() {
        let snapshot = WorkspaceSnapshot {
            variables: vec![
                Variable::new("pageType", VariableKind::DataLayer),
                Variable::new("Data Layer - ok", VariableKind::DataLayer),
                Variable::new("userId", VariableKind::DataLayer),
            ],
            tags: vec![Tag::new("GA - event", "ua")
                .with_parameter(Parameter::template("eventCategory", "Foo-Bar"))],
            triggers: vec![Trigger::new("purchase", TriggerKind::CustomEvent)],
        };

        let result = RuleSet::standard().check_snapshot(&snapshot);
        let names: Vec<&str> = result
            .findings
            .iter()
            .map(|f| f.entity_name.as_str())
            .collect();
        assert_eq!(names, vec!["pageType", "userId", "GA - event", "purchase"]);
        assert_eq!(result, RuleSet::standard().check_snapshot(&snapshot));
    }

    #[test]
    fn empty_rule_set_passes_everything() {
        let snapshot = WorkspaceSnapshot {
            variables: vec![Variable::new("pageType", VariableKind::DataLayer)],
            ..WorkspaceSnapshot::default()
        };
        assert!(RuleSet::empty().check_snapshot(&snapshot).passed());
    }
}
