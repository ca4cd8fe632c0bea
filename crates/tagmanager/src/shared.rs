use crate::api::TagManagerApi;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Creates the process-wide API handle.
#[async_trait]
pub trait Connect: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn TagManagerApi>>;
}

/// Hands out an already-built API handle.
pub struct Ready(pub Arc<dyn TagManagerApi>);

#[async_trait]
impl Connect for Ready {
    async fn connect(&self) -> Result<Arc<dyn TagManagerApi>> {
        Ok(Arc::clone(&self.0))
    }
}

/// Lazily-initialized API handle shared by every command.
///
/// Concurrent first callers wait on the same initialization; a failed
/// initialization leaves the cell empty so the next command tries again.
pub struct SharedTagManager {
    connector: Box<dyn Connect>,
    handle: OnceCell<Arc<dyn TagManagerApi>>,
}

impl SharedTagManager {
    pub fn new(connector: impl Connect + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            handle: OnceCell::new(),
        }
    }

    pub fn with_handle(api: Arc<dyn TagManagerApi>) -> Self {
        Self::new(Ready(api))
    }

    pub async fn get(&self) -> Result<Arc<dyn TagManagerApi>> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                log::info!("Initializing Tag Manager API handle");
                self.connector.connect().await
            })
            .await?;
        Ok(Arc::clone(handle))
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }
}
