//! Functions: named remote procedures invoked with query arguments.

use crate::definition::ResourceDefinition;
use crate::error::ClientError;
use crate::proxy::{bind_resource, resolve, Resolution};
use crate::request::{call_path, Query, Request, ResourceKind};
use crate::response::Payload;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionMethod {
    Call,
}

impl FunctionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionMethod::Call => "call",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        (name == "call").then_some(FunctionMethod::Call)
    }
}

#[derive(Clone)]
pub struct FunctionProxy {
    transport: Arc<Transport>,
    definition: Arc<ResourceDefinition>,
}

impl FunctionProxy {
    /// Discover functions with `GET function/`.
    pub async fn load(transport: Arc<Transport>) -> Result<Self, ClientError> {
        let definition = ResourceDefinition::load(&transport, ResourceKind::Function).await?;
        Ok(Self::with_definition(transport, definition))
    }

    pub fn with_definition(transport: Arc<Transport>, definition: ResourceDefinition) -> Self {
        FunctionProxy {
            transport,
            definition: Arc::new(definition),
        }
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    pub fn resolve(&self, name: &str) -> Result<Resolution<FunctionMethod, Function>, ClientError> {
        resolve(name, FunctionMethod::from_name(name), &self.definition, |d| {
            self.bind(name, d)
        })
    }

    pub fn function(&self, name: &str) -> Result<Function, ClientError> {
        bind_resource(name, &self.definition, |d| self.bind(name, d))
    }

    fn bind(&self, name: &str, description: &Value) -> Function {
        Function {
            transport: Arc::clone(&self.transport),
            name: name.to_string(),
            description: description.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Function {
    transport: Arc<Transport>,
    name: String,
    description: Value,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish()
    }
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn describe(&self) -> &Value {
        &self.description
    }

    /// `GET function/<name>/?k=v&...`
    pub async fn call(&self, args: &Query) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::get(call_path(&self.name, args)))
            .await
    }
}
