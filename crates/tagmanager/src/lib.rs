//! # GTM Tag Manager
//!
//! Workspace model and API collaborator for the GTM bot.
//!
//! ## Architecture
//!
//! ```text
//! SharedTagManager (once-only init)
//!     │
//!     └──> dyn TagManagerApi
//!            ├─ HttpTagManager   (Tag Manager v2 REST, bearer token)
//!            └─ MemoryTagManager (fixture-backed, records calls)
//!
//! list_* ──> Container / Workspace / Variable / Tag / Trigger
//!                                   │
//!                                   └──> WorkspaceSnapshot ──> artifact JSON
//! ```

mod api;
mod error;
mod http;
pub mod memory;
mod model;
mod shared;
mod snapshot;

pub use api::TagManagerApi;
pub use error::{Result, TagManagerError};
pub use http::{HttpConnector, HttpTagManager, DEFAULT_BASE_URL};
pub use memory::{Collection, Fixture, MemoryTagManager};
pub use model::{
    account_path, container_path, workspace_path, Bookkeeping, Condition, ConditionKind,
    Container, EntityKind, EntityRef, Parameter, Tag, Trigger, TriggerKind, Variable,
    VariableKind, Workspace, DEFAULT_WORKSPACE_NAME,
};
pub use shared::{Connect, Ready, SharedTagManager};
pub use snapshot::{
    ContainerList, ListPage, TagList, TriggerList, VariableList, WorkspaceList,
    WorkspaceSnapshot,
};
