//! Parlor server binary.

use parlor::{ParlorError, ParlorServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("PARLOR_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let server = ParlorServer::builder().bind(&addr).build().await?;
    server.run().await
}
