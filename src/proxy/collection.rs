//! Collections: CRUD-style access to named record sets.

use crate::definition::ResourceDefinition;
use crate::error::ClientError;
use crate::proxy::{bind_resource, resolve, Resolution};
use crate::request::{
    collection_path, count_path, filter_path, record_path, record_update_path, Query, Request,
    ResourceKind,
};
use crate::response::{extract_count, Payload};
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;

/// Names reserved by the collection proxy. They never resolve to a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionMethod {
    Filter,
    Get,
    Delete,
    Save,
    Count,
}

impl CollectionMethod {
    pub const ALL: [CollectionMethod; 5] = [
        CollectionMethod::Filter,
        CollectionMethod::Get,
        CollectionMethod::Delete,
        CollectionMethod::Save,
        CollectionMethod::Count,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionMethod::Filter => "filter",
            CollectionMethod::Get => "get",
            CollectionMethod::Delete => "delete",
            CollectionMethod::Save => "save",
            CollectionMethod::Count => "count",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

#[derive(Clone)]
pub struct CollectionProxy {
    transport: Arc<Transport>,
    definition: Arc<ResourceDefinition>,
}

impl CollectionProxy {
    /// Discover collections with `GET collection/`. Fails with whatever the transport reports.
    pub async fn load(transport: Arc<Transport>) -> Result<Self, ClientError> {
        let definition = ResourceDefinition::load(&transport, ResourceKind::Collection).await?;
        Ok(Self::with_definition(transport, definition))
    }

    pub fn with_definition(transport: Arc<Transport>, definition: ResourceDefinition) -> Self {
        CollectionProxy {
            transport,
            definition: Arc::new(definition),
        }
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    pub fn resolve(&self, name: &str) -> Result<Resolution<CollectionMethod, Collection>, ClientError> {
        resolve(name, CollectionMethod::from_name(name), &self.definition, |d| {
            self.bind(name, d)
        })
    }

    /// Handle bound to a discovered collection, or `NotFound`.
    pub fn collection(&self, name: &str) -> Result<Collection, ClientError> {
        bind_resource(name, &self.definition, |d| self.bind(name, d))
    }

    fn bind(&self, name: &str, description: &Value) -> Collection {
        Collection {
            transport: Arc::clone(&self.transport),
            name: name.to_string(),
            description: description.clone(),
        }
    }
}

/// A collection bound by name. Every operation is one request, except `describe`.
#[derive(Clone)]
pub struct Collection {
    transport: Arc<Transport>,
    name: String,
    description: Value,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish()
    }
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition entry discovered for this collection. No request.
    pub fn describe(&self) -> &Value {
        &self.description
    }

    /// `GET collection/<name>/<pk>`. A non-JSON body comes back as [`Payload::Text`].
    pub async fn get(&self, pk: impl Display) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::get(record_path(&self.name, pk)))
            .await
    }

    /// Strict typed read: the body must be JSON that deserializes into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, pk: impl Display) -> Result<T, ClientError> {
        decode(self.get(pk).await?.into_json()?)
    }

    /// `GET collection/<name>/?k=v&...`
    pub async fn filter(&self, query: &Query) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::get(filter_path(&self.name, query)))
            .await
    }

    /// Strict typed read: the body must be a JSON array of `T`.
    pub async fn filter_as<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, ClientError> {
        match self.filter(query).await?.into_json()? {
            Value::Array(records) => records.into_iter().map(decode).collect(),
            other => Err(ClientError::Decode(format!(
                "filter on '{}' expected a JSON array, got {}",
                self.name, other
            ))),
        }
    }

    /// `GET collection/<name>/count/?k=v&...`, reading the `count` field.
    pub async fn count(&self, query: &Query) -> Result<u64, ClientError> {
        let payload = self
            .transport
            .execute(&Request::get(count_path(&self.name, query)))
            .await?;
        extract_count(payload)
    }

    /// `DELETE collection/<name>/<pk>`
    pub async fn delete(&self, pk: impl Display) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::delete(record_path(&self.name, pk)))
            .await
    }

    /// `PUT collection/<name>/` with `objs` as the body.
    pub async fn insert(&self, objs: &Value) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::put(collection_path(&self.name), objs.clone()))
            .await
    }

    /// `POST collection/<name>/<pk>/` with `obj` as the body.
    pub async fn update(&self, pk: impl Display, obj: &Value) -> Result<Payload, ClientError> {
        self.transport
            .execute(&Request::post(record_update_path(&self.name, pk), obj.clone()))
            .await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}
