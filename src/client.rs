//! Entry point: owns the shared transport and builds proxies on demand.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::proxy::{Collection, CollectionProxy, Function, FunctionProxy};
use crate::transport::Transport;
use std::sync::Arc;

/// Cheap to clone; all clones share one HTTP session. Construction does no I/O.
#[derive(Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Client {
            transport: Arc::new(Transport::new(config)?),
        })
    }

    /// [`ClientConfig::from_env`] then [`Client::new`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::from_env()?)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Load the collection definitions (one request).
    pub async fn collections(&self) -> Result<CollectionProxy, ClientError> {
        CollectionProxy::load(Arc::clone(&self.transport)).await
    }

    /// Load the function definitions (one request).
    pub async fn functions(&self) -> Result<FunctionProxy, ClientError> {
        FunctionProxy::load(Arc::clone(&self.transport)).await
    }

    /// Shortcut for a single collection: loads definitions, then binds `name`.
    pub async fn resource(&self, name: &str) -> Result<Collection, ClientError> {
        self.collections().await?.collection(name)
    }

    /// Shortcut for a single function.
    pub async fn function(&self, name: &str) -> Result<Function, ClientError> {
        self.functions().await?.function(name)
    }
}
