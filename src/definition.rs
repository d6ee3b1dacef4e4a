//! Resource definitions discovered from the service, loaded once per proxy.

use crate::error::ClientError;
use crate::request::{discovery_path, ResourceKind};
use crate::transport::Transport;
use serde_json::{Map, Value};

/// Resource name -> server-provided description. Read-only after load.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDefinition {
    kind: ResourceKind,
    entries: Map<String, Value>,
}

impl ResourceDefinition {
    /// `GET collection/` or `GET function/` and keep the returned object.
    pub async fn load(transport: &Transport, kind: ResourceKind) -> Result<Self, ClientError> {
        let path = discovery_path(kind);
        let payload = transport.send(reqwest::Method::GET, &path, None).await?;
        let definition = Self::from_value(kind, payload.into_json()?)?;
        tracing::debug!(kind = %kind, resources = definition.len(), "loaded resource definition");
        Ok(definition)
    }

    pub fn from_value(kind: ResourceKind, value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(entries) => Ok(ResourceDefinition {
                kind,
                entries,
            }),
            other => Err(ClientError::Decode(format!(
                "{} definition must be a JSON object, got {}",
                kind, other
            ))),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn membership_and_lookup() {
        let def = ResourceDefinition::from_value(
            ResourceKind::Collection,
            json!({"users": {"pk": "id"}, "orders": {}}),
        )
        .unwrap();
        assert!(def.contains("users"));
        assert!(!def.contains("ghost"));
        assert_eq!(def.get("users"), Some(&json!({"pk": "id"})));
        assert_eq!(def.len(), 2);
        let mut names: Vec<_> = def.names().collect();
        names.sort();
        assert_eq!(names, vec!["orders", "users"]);
    }

    #[test]
    fn non_object_is_rejected() {
        let err = ResourceDefinition::from_value(ResourceKind::Function, json!(["add"])).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
