use crate::finding::Finding;
use crate::rule::Rule;
use gtm_tagmanager::{ConditionKind, Trigger};

pub const JS_SELECTOR_PREFIX: &str = ".js_";

/// Key of the condition parameter holding the selector expression.
const SELECTOR_ARGUMENT: &str = "arg1";

/// CSS selector filters may only target `.js_` hooks (or `*`).
pub struct CssSelectorConvention;

impl Rule<Trigger> for CssSelectorConvention {
    fn id(&self) -> &'static str {
        "css-selector-convention"
    }

    fn evaluate(&self, trigger: &Trigger) -> Option<Finding> {
        let offending = trigger
            .filter
            .iter()
            .filter(|condition| match &condition.kind {
                ConditionKind::CssSelector => true,
                ConditionKind::Other(_) => false,
            })
            .flat_map(|condition| condition.arguments(SELECTOR_ARGUMENT))
            .find(|selector| !selector_conforms(selector))?;

        Some(Finding::new(
            &trigger.name,
            format!(
                "Trigger `{}` failed validation, Make sure your css selectors begin with `{}`. Right now they look like: `{}`",
                trigger.name, JS_SELECTOR_PREFIX, offending
            ),
        ))
    }
}

/// Every whitespace-separated token is `*` or a `.js_` class. A blank
/// selector matches nothing and does not conform.
fn selector_conforms(selector: &str) -> bool {
    let mut tokens = selector.split_whitespace().peekable();
    tokens.peek().is_some()
        && tokens.all(|token| token == "*" || token.starts_with(JS_SELECTOR_PREFIX))
}
