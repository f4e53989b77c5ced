//! Upload a `steam-games.json` snapshot to R2.
//!
//! ```shell
//! R2_ACCOUNT_ID=... R2_BUCKET=... R2_ACCESS_KEY_ID=... R2_SECRET_ACCESS_KEY=... \
//!     cargo run --example upload_steam_games -- public/data/steam-games.json
//! ```

use anyhow::{Context as _, Result};
use log::info;
use r2sign_aws_v4::{Config, EnvCredentialProvider, Uploader};
use r2sign_core::{Context, OsEnv};
use r2sign_http_send_reqwest::ReqwestHttpSend;

const DEFAULT_PATH: &str = "public/data/steam-games.json";
const OBJECT_KEY: &str = "steam-games.json";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PATH.to_string());
    let content = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {path}"))?;

    // Refuse to publish a snapshot that isn't valid JSON.
    let snapshot: serde_json::Value = serde_json::from_slice(&content)
        .with_context(|| format!("{path} is not valid json"))?;
    let games = snapshot["games"].as_array().map_or(0, |v| v.len());

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::default().from_env(&ctx);
    let url = config.object_url(OBJECT_KEY)?;

    let uploader = Uploader::new(ctx, config, EnvCredentialProvider::new());
    match uploader
        .put_object(OBJECT_KEY, "application/json", content)
        .await
    {
        Ok(()) => {
            info!("uploaded {games} games to {url}");
            println!("Uploaded {path} to {url}");
            Ok(())
        }
        Err(err) if err.is_signing_error() => {
            Err(anyhow::Error::new(err).context("request was not signed, nothing was sent"))
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!("upload to {url} failed"))),
    }
}
