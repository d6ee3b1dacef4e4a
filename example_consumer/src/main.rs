//! Example consumer: a separate Rust project that uses httpsql as a dependency.
//!
//! Reads `HTTP_ENDPOINT` (and optionally `HTTP_USER`/`HTTP_PASS`) from the environment or `.env`.
//! Run from repo root: `cargo run -p example-consumer -- users status=active`

use httpsql::{Client, Query};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("httpsql=info")),
        )
        .init();

    let client = Client::from_env()?;
    tracing::info!("using endpoint {}", client.transport().endpoint());

    let collections = client.collections().await?;
    let functions = client.functions().await?;
    for name in collections.definition().names() {
        println!("collection {}", name);
    }
    for name in functions.definition().names() {
        println!("function   {}", name);
    }

    // Optional: `<collection> [key=value ...]` counts matching records.
    let mut args = std::env::args().skip(1);
    if let Some(name) = args.next() {
        let query: Query = args
            .filter_map(|a| a.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())))
            .collect();
        let collection = collections.collection(&name)?;
        let count = collection.count(&query).await?;
        println!("{}: {} matching records", name, count);
    }
    Ok(())
}
