//! Request building: ordered query arguments and the path for every wire operation.
//!
//! Paths are relative to the configured endpoint (`collection/users/42`); the transport joins them.

use reqwest::Method;
use serde_json::Value;
use std::fmt::Display;

/// The two resource families the service exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Collection,
    Function,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Collection => "collection",
            ResourceKind::Function => "function",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query arguments, kept in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    args: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    /// Add `key=value`. Values are rendered with `Display`.
    pub fn arg(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
        self.args.push((key.into(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `a=1&b=2`, percent-encoded, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.args
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `?a=1&b=2`, or nothing when there are no arguments.
    fn suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.to_query_string())
        }
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut q = Query::new();
        for (k, v) in iter {
            q.push(k, v);
        }
        q
    }
}

/// `collection/` or `function/`: the schema listing for a resource family.
pub fn discovery_path(kind: ResourceKind) -> String {
    format!("{}/", kind)
}

/// `collection/<name>/<pk>`
pub fn record_path(name: &str, pk: impl Display) -> String {
    format!("collection/{}/{}", name, urlencoding::encode(&pk.to_string()))
}

/// `collection/<name>/<pk>/`
pub fn record_update_path(name: &str, pk: impl Display) -> String {
    format!("{}/", record_path(name, pk))
}

/// `collection/<name>/`
pub fn collection_path(name: &str) -> String {
    format!("collection/{}/", name)
}

/// `collection/<name>/?k=v&...`
pub fn filter_path(name: &str, query: &Query) -> String {
    format!("{}{}", collection_path(name), query.suffix())
}

/// `collection/<name>/count/?k=v&...`
pub fn count_path(name: &str, query: &Query) -> String {
    format!("collection/{}/count/{}", name, query.suffix())
}

/// `function/<name>/?k=v&...`
pub fn call_path(name: &str, query: &Query) -> String {
    format!("function/{}/{}", name, query.suffix())
}

/// One HTTP call: verb, relative path, optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(path: String) -> Self {
        Request {
            method: Method::GET,
            path,
            body: None,
        }
    }

    pub fn delete(path: String) -> Self {
        Request {
            method: Method::DELETE,
            path,
            body: None,
        }
    }

    pub fn put(path: String, body: Value) -> Self {
        Request {
            method: Method::PUT,
            path,
            body: Some(body),
        }
    }

    pub fn post(path: String, body: Value) -> Self {
        Request {
            method: Method::POST,
            path,
            body: Some(body),
        }
    }
}
