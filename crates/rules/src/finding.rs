use serde::Serialize;
use std::fmt;

/// One rule violation tied to a single entity.
///
/// `Display` renders the chat form: the message wrapped in the error glyph
/// and italics, e.g. `:x: _Variable `x` failed validation, ..._`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub entity_name: String,
    pub message: String,
}

impl Finding {
    #[must_use]
    pub fn new(entity_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":x: _{}_", self.message)
    }
}

/// Ordered findings of one validation run. Order is entity fetch order, then
/// rule registration order; nothing is re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub findings: Vec<Finding>,
}

impl ValidationResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// All findings in chat form, one per line
    #[must_use]
    pub fn report(&self) -> String {
        self.findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<Finding> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self {
            findings: iter.into_iter().collect(),
        }
    }
}
