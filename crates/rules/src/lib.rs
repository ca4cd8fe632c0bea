//! # GTM Rules
//!
//! Workspace conventions checked before a container is published.
//!
//! | Entity   | Rule                      | Requirement                                      |
//! |----------|---------------------------|--------------------------------------------------|
//! | Variable | `data-layer-prefix`       | data layer variables are named `Data Layer - …`  |
//! | Tag      | `event-param-format`      | event action/category/label are lower case, no `-` |
//! | Trigger  | `custom-event-prefix`     | custom event triggers are named `Custom Event - …` |
//! | Trigger  | `css-selector-convention` | CSS selector filters only use `.js_` hooks or `*` |

mod finding;
mod naming;
mod rule;
mod selectors;
mod tags;

pub use finding::{Finding, ValidationResult};
pub use naming::{CustomEventPrefix, DataLayerPrefix, CUSTOM_EVENT_PREFIX, DATA_LAYER_PREFIX};
pub use rule::{Rule, RuleSet};
pub use selectors::{CssSelectorConvention, JS_SELECTOR_PREFIX};
pub use tags::{EventFields, EventParamFormat};
