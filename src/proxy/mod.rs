//! Resource proxies. A proxy holds the definitions it discovered and resolves names against
//! its fixed method set and those definitions; resolving a resource yields an immutable handle
//! bound to that name.

mod collection;
mod function;

pub use collection::{Collection, CollectionMethod, CollectionProxy};
pub use function::{Function, FunctionMethod, FunctionProxy};

use crate::definition::ResourceDefinition;
use crate::error::ClientError;

/// Outcome of resolving a name on a proxy.
#[derive(Clone, Debug)]
pub enum Resolution<M, H> {
    /// The name is one of the proxy's fixed methods.
    Method(M),
    /// The name is a discovered resource; the handle is bound to it.
    Resource(H),
}

impl<M, H> Resolution<M, H> {
    pub fn into_resource(self) -> Option<H> {
        match self {
            Resolution::Resource(h) => Some(h),
            Resolution::Method(_) => None,
        }
    }

    pub fn method(&self) -> Option<&M> {
        match self {
            Resolution::Method(m) => Some(m),
            Resolution::Resource(_) => None,
        }
    }
}

/// Methods first, then discovered resources, else `NotFound`. No I/O.
fn resolve<M, H>(
    name: &str,
    method: Option<M>,
    definition: &ResourceDefinition,
    bind: impl FnOnce(&serde_json::Value) -> H,
) -> Result<Resolution<M, H>, ClientError> {
    if let Some(m) = method {
        return Ok(Resolution::Method(m));
    }
    bind_resource(name, definition, bind).map(Resolution::Resource)
}

fn bind_resource<H>(
    name: &str,
    definition: &ResourceDefinition,
    bind: impl FnOnce(&serde_json::Value) -> H,
) -> Result<H, ClientError> {
    match definition.get(name) {
        Some(description) => Ok(bind(description)),
        None => {
            tracing::debug!(kind = %definition.kind(), name, "unresolved name");
            Err(ClientError::NotFound(format!(
                "Invalid {} or method",
                definition.kind()
            )))
        }
    }
}
