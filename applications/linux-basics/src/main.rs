//! Connects with a PSK and writes one value of every LightDB type.
//!
//! Reads `GOLIOTH_SDK_LIBRARY`, `GOLIOTH_PSK_ID` and `GOLIOTH_PSK` from the
//! environment or a `.env` file.

use anyhow::Context;
use libgolioth::{Client, NativeLibrary, Options};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Nested {
    key1: i32,
}

#[derive(Serialize)]
struct StructuredData {
    key0: i32,
    nested: Nested,
    array: [i32; 4],
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let psk_id = std::env::var("GOLIOTH_PSK_ID").context("GOLIOTH_PSK_ID is not set")?;
    let psk = std::env::var("GOLIOTH_PSK").context("GOLIOTH_PSK is not set")?;

    let sdk = NativeLibrary::global_from_env().context("loading the Golioth SDK")?;
    let options = Options::from_env()?;
    let client = Client::connect_psk(sdk, psk_id.as_bytes(), psk.as_bytes(), options)
        .context("connecting to Golioth")?;
    tracing::info!("connected as {}", psk_id);

    let lightdb = client.lightdb();
    lightdb.set("counter", 0)?;
    lightdb.set("temperature", 21.5_f32)?;
    lightdb.set("is_rust", true)?;
    lightdb.set("my_psk_id", psk_id.as_str())?;
    lightdb.set_structured(
        "structured_data",
        &StructuredData {
            key0: 14,
            nested: Nested { key1: 15 },
            array: [5, 6, 7, 8],
        },
    )?;

    tracing::info!("LightDB state written");
    Ok(())
}
