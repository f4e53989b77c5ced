//! Uploads against a real R2 bucket.
//!
//! Enabled by `R2SIGN_R2_TEST=on`, reads `R2_ACCOUNT_ID`, `R2_BUCKET`,
//! `R2_ACCESS_KEY_ID` and `R2_SECRET_ACCESS_KEY` from the environment or `.env`.

use std::env;

use anyhow::Result;
use log::warn;
use r2sign_aws_v4::{Config, EnvCredentialProvider, StaticCredentialProvider, Uploader};
use r2sign_core::{Context, ErrorKind, OsEnv};
use r2sign_http_send_reqwest::ReqwestHttpSend;

fn init_live_test() -> Option<Context> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("R2SIGN_R2_TEST").ok().as_deref() != Some("on") {
        warn!("R2SIGN_R2_TEST is not set, skipped");
        return None;
    }

    Some(
        Context::new()
            .with_env(OsEnv)
            .with_http_send(ReqwestHttpSend::default()),
    )
}

#[tokio::test]
async fn test_live_put_object() -> Result<()> {
    let Some(ctx) = init_live_test() else {
        return Ok(());
    };
    let config = Config::default().from_env(&ctx);

    let body = serde_json::json!({
        "lastUpdated": "2024-01-15T12:00:00.000Z",
        "games": [{ "appid": 570, "name": "Dota 2" }],
    });
    Uploader::new(ctx, config, EnvCredentialProvider::new())
        .put_object(
            "r2sign-test/steam-games.json",
            "application/json",
            serde_json::to_vec(&body)?,
        )
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_live_put_object_with_wrong_secret() -> Result<()> {
    let Some(ctx) = init_live_test() else {
        return Ok(());
    };
    let config = Config::default().from_env(&ctx);
    let access_key_id = env::var("R2_ACCESS_KEY_ID")?;

    let err = Uploader::new(
        ctx,
        config,
        StaticCredentialProvider::new(&access_key_id, "not-the-secret"),
    )
    .put_object("r2sign-test/denied.json", "application/json", "{}")
    .await
    .expect_err("wrong secret must be rejected");

    assert_eq!(err.kind(), ErrorKind::UploadFailed);
    assert_eq!(err.response_status(), Some(http::StatusCode::FORBIDDEN));

    Ok(())
}
