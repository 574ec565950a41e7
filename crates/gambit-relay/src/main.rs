//! `gambit-relay` binary.
//!
//! Usage: `gambit-relay [ADDR]`. The bind address comes from the first
//! argument, then `GAMBIT_RELAY_ADDR`, then `0.0.0.0:8080`. Log filtering
//! follows `RUST_LOG` (default `info`).

use gambit_relay::{Relay, RelayError};
use tracing_subscriber::EnvFilter;

const ADDR_ENV: &str = "GAMBIT_RELAY_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ADDR_ENV).ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let relay = Relay::builder().bind(&addr).build().await?;
    relay.run().await
}
