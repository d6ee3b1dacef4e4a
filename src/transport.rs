//! One persistent HTTP session against the configured endpoint.

use crate::config::{validate_client_config, ClientConfig};
use crate::error::{ClientError, ConfigError};
use crate::request::Request;
use crate::response::{classify, Payload};
use reqwest::Method;
use serde_json::Value;

pub struct Transport {
    http: reqwest::Client,
    endpoint: String,
    basic_auth: Option<(String, String)>,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        validate_client_config(config)?;
        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(!config.verify_tls);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ConfigError::Invalid {
            key: "http_client",
            reason: e.to_string(),
        })?;
        if !config.verify_tls {
            tracing::warn!(endpoint = %config.endpoint, "TLS certificate verification disabled");
        }

        Ok(Transport {
            http,
            endpoint: config.endpoint.trim().trim_end_matches('/').to_string(),
            basic_auth: config
                .basic_auth()
                .map(|(u, p)| (u.to_string(), p.to_string())),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `endpoint/path` with exactly one separator.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    pub async fn execute(&self, request: &Request) -> Result<Payload, ClientError> {
        self.send(request.method.clone(), &request.path, request.body.as_ref())
            .await
    }

    /// Issue exactly one request. Error statuses become typed errors; network failures become `Transport`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Payload, ClientError> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "request");

        let mut req = self.http.request(method, &url).json(&wire_body(body));
        if let Some((user, pass)) = &self.basic_auth {
            req = req.basic_auth(user, Some(pass));
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(status = %status, url = %url, "response");
        classify(status, text)
    }
}

/// Body as sent on the wire. Absent or empty bodies go out as the JSON string `""`.
fn wire_body(body: Option<&Value>) -> Value {
    match body {
        Some(v) if !is_empty_json(v) => v.clone(),
        _ => Value::String(String::new()),
    }
}

fn is_empty_json(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}
