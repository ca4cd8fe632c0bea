use crate::finding::Finding;
use crate::rule::Rule;
use gtm_tagmanager::Tag;
use std::collections::BTreeMap;
use std::fmt;

/// Marker of a built-in variable reference such as `{{Page Path}}`.
const VARIABLE_REFERENCE: &str = "{{";

/// Event fields checked on analytics tags, as `(parameter key, short name)`.
const EVENT_FIELDS: [(&str, &str); 3] = [
    ("eventAction", "action"),
    ("eventCategory", "category"),
    ("eventLabel", "label"),
];

/// Event action, category and label must be lower case with spaces instead
/// of dashes. Values holding a variable reference are exempt since their
/// casing is not under the author's control.
pub struct EventParamFormat;

impl Rule<Tag> for EventParamFormat {
    fn id(&self) -> &'static str {
        "event-param-format"
    }

    fn evaluate(&self, tag: &Tag) -> Option<Finding> {
        let raw = EventFields::collect(tag);
        let canonical = raw.canonical();
        if raw == canonical {
            return None;
        }

        Some(Finding::new(
            &tag.name,
            format!(
                "Tag `{}` failed validation, ensure values are lower case and formatted correctly! `{}`.  It should probably be: `{}`",
                tag.name, raw, canonical
            ),
        ))
    }
}

/// Present event fields keyed by short name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventFields(BTreeMap<&'static str, String>);

impl EventFields {
    fn collect(tag: &Tag) -> Self {
        let mut fields = BTreeMap::new();
        for parameter in &tag.parameter {
            if parameter.value.contains(VARIABLE_REFERENCE) {
                continue;
            }
            if let Some((_, short)) = EVENT_FIELDS
                .iter()
                .find(|(key, _)| *key == parameter.key)
            {
                fields.insert(*short, parameter.value.clone());
            }
        }
        Self(fields)
    }

    fn canonical(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(key, value)| (*key, canonical_value(value)))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, short_name: &str) -> Option<&str> {
        self.0.get(short_name).map(String::as_str)
    }
}

impl fmt::Display for EventFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

fn canonical_value(value: &str) -> String {
    value.to_lowercase().replace('-', " ")
}
