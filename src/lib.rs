//! httpsql: client SDK for a collection/function HTTP service, plus the pooled
//! PostgreSQL helper the service side uses.
//!
//! ```no_run
//! use httpsql::{Client, ClientConfig, Query};
//!
//! # async fn example() -> Result<(), httpsql::ClientError> {
//! let client = Client::new(&ClientConfig::new("https://api.example.com"))?;
//! let collections = client.collections().await?;
//! let users = collections.collection("users")?;
//! let active = users.count(&Query::new().arg("status", "active")).await?;
//! let user = users.get(42).await?;
//! # let _ = (active, user);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod definition;
pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, DbConfig};
pub use db::{fetch_all_as_records, DbPool, PooledConnection, Record};
pub use definition::ResourceDefinition;
pub use error::{ClientError, ConfigError, DbError, ErrorKind};
pub use proxy::{
    Collection, CollectionMethod, CollectionProxy, Function, FunctionMethod, FunctionProxy,
    Resolution,
};
pub use request::{Query, Request, ResourceKind};
pub use response::Payload;
pub use transport::Transport;
