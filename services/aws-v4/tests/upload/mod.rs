use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::StatusCode;
use pretty_assertions::assert_eq;
use r2sign_aws_v4::{
    Config, EnvCredentialProvider, RequestSigner, StaticCredentialProvider, Uploader,
};
use r2sign_core::time::parse_iso8601;
use r2sign_core::{Context, Error, ErrorKind, HttpSend, Result, SigningRequest, StaticEnv};

/// HttpSend that records every request and answers with a fixed response.
#[derive(Debug, Clone)]
struct MockHttpSend {
    status: StatusCode,
    body: &'static str,
    fail: bool,
    sent: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            fail: false,
            sent: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(StatusCode::OK, "")
        }
    }

    fn sent(&self) -> Vec<http::Request<Bytes>> {
        self.sent.lock().unwrap().drain(..).collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.sent.lock().unwrap().push(req);
        if self.fail {
            return Err(Error::unexpected("connection reset by peer"));
        }

        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))
            .unwrap())
    }
}

fn config() -> Config {
    Config::default()
        .with_account_id("acct123")
        .with_bucket("my-games")
}

fn uploader(http: &MockHttpSend) -> Uploader {
    let ctx = Context::new().with_http_send(http.clone());
    Uploader::new(
        ctx,
        config(),
        StaticCredentialProvider::new("AKIDTEST", "testsecret"),
    )
}

#[tokio::test]
async fn test_put_object_sends_signed_request() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = MockHttpSend::new(StatusCode::OK, "");
    let body = r#"{"lastUpdated":"2024-01-15T12:00:00.000Z","games":[]}"#;
    uploader(&http)
        .put_object("steam-games.json", "application/json", body)
        .await?;

    let sent = http.sent();
    assert_eq!(sent.len(), 1);
    let req = &sent[0];
    assert_eq!(req.method(), http::Method::PUT);
    assert_eq!(
        req.uri().to_string(),
        "https://acct123.r2.cloudflarestorage.com/my-games/steam-games.json"
    );
    assert_eq!(req.body().as_ref(), body.as_bytes());

    let mut names = req
        .headers()
        .keys()
        .map(|k| k.as_str())
        .collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "authorization",
            "content-type",
            "x-amz-content-sha256",
            "x-amz-date"
        ]
    );

    // Re-sign with the timestamp the uploader picked, the result must match byte for byte.
    let amz_date = req.headers()["x-amz-date"].to_str()?;
    let expected = RequestSigner::r2().sign(
        SigningRequest::put(
            "acct123.r2.cloudflarestorage.com",
            "/my-games/steam-games.json",
            "application/json",
            body,
            parse_iso8601(amz_date)?,
        )?,
        &r2sign_aws_v4::Credential::new("AKIDTEST", "testsecret"),
    )?;
    assert_eq!(
        req.headers()[AUTHORIZATION],
        expected.headers()[AUTHORIZATION]
    );
    assert!(req.headers()[AUTHORIZATION]
        .to_str()?
        .starts_with(&format!(
            "AWS4-HMAC-SHA256 Credential=AKIDTEST/{}/auto/s3/aws4_request, ",
            &amz_date[..8]
        )));

    Ok(())
}

#[tokio::test]
async fn test_put_object_reports_downstream_failure() {
    let http = MockHttpSend::new(
        StatusCode::FORBIDDEN,
        "<Error><Code>SignatureDoesNotMatch</Code></Error>",
    );

    let err = uploader(&http)
        .put_object("steam-games.json", "application/json", "{}")
        .await
        .expect_err("403 must fail");

    assert_eq!(err.kind(), ErrorKind::UploadFailed);
    assert!(!err.is_signing_error());
    assert_eq!(err.response_status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(
        err.response_body(),
        Some("<Error><Code>SignatureDoesNotMatch</Code></Error>")
    );
    // Never retried.
    assert_eq!(http.sent().len(), 1);
}

#[tokio::test]
async fn test_put_object_reports_transport_failure() {
    let http = MockHttpSend::failing();

    let err = uploader(&http)
        .put_object("steam-games.json", "application/json", "{}")
        .await
        .expect_err("transport error must fail");

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(http.sent().len(), 1);
}

#[tokio::test]
async fn test_put_object_empty_key_is_not_sent() {
    let http = MockHttpSend::new(StatusCode::OK, "");

    let err = uploader(&http)
        .put_object("", "application/json", "{}")
        .await
        .expect_err("empty key must fail");

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(err.is_signing_error());
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn test_put_object_missing_credential_is_not_sent() {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_env(StaticEnv::default());

    let err = Uploader::new(ctx, config(), EnvCredentialProvider::new())
        .put_object("steam-games.json", "application/json", "{}")
        .await
        .expect_err("missing credential must fail");

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn test_put_object_empty_secret_is_not_sent() {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = Context::new().with_http_send(http.clone());

    let err = Uploader::new(ctx, config(), StaticCredentialProvider::new("AKIDTEST", ""))
        .put_object("steam-games.json", "application/json", "{}")
        .await
        .expect_err("empty secret must fail");

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn test_put_object_missing_config_is_not_sent() {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = Context::new().with_http_send(http.clone());

    let err = Uploader::new(
        ctx,
        Config::default().with_bucket("my-games"),
        StaticCredentialProvider::new("AKIDTEST", "testsecret"),
    )
    .put_object("steam-games.json", "application/json", "{}")
    .await
    .expect_err("missing account id must fail");

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn test_put_object_with_env_config_and_credential() -> anyhow::Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_env(StaticEnv {
            envs: HashMap::from([
                ("R2_ACCOUNT_ID".to_string(), "acct456".to_string()),
                ("R2_BUCKET".to_string(), "photos".to_string()),
                ("R2_ACCESS_KEY_ID".to_string(), "AKIDENV".to_string()),
                ("R2_SECRET_ACCESS_KEY".to_string(), "envsecret".to_string()),
            ]),
        });
    let config = Config::default().from_env(&ctx);

    Uploader::new(ctx, config, EnvCredentialProvider::new())
        .put_object("g1/p1.jpg", "image/jpeg", Bytes::from_static(&[0xff, 0xd8, 0xff]))
        .await?;

    let sent = http.sent();
    assert_eq!(
        sent[0].uri().to_string(),
        "https://acct456.r2.cloudflarestorage.com/photos/g1/p1.jpg"
    );
    assert_eq!(sent[0].headers()["content-type"], "image/jpeg");
    assert!(sent[0].headers()[AUTHORIZATION]
        .to_str()?
        .starts_with("AWS4-HMAC-SHA256 Credential=AKIDENV/"));

    Ok(())
}

#[tokio::test]
async fn test_put_object_default_port_is_not_signed() -> anyhow::Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let ctx = Context::new().with_http_send(http.clone());
    let config = Config {
        storage_host: "r2.cloudflarestorage.com:443".to_string(),
        ..config()
    };

    Uploader::new(
        ctx,
        config,
        StaticCredentialProvider::new("AKIDTEST", "testsecret"),
    )
    .put_object("steam-games.json", "application/json", "{}")
    .await?;

    let sent = http.sent();
    assert_eq!(
        sent[0].uri().authority().map(|v| v.as_str()),
        Some("acct123.r2.cloudflarestorage.com")
    );
    let amz_date = sent[0].headers()["x-amz-date"].to_str()?;
    let expected = RequestSigner::r2().sign(
        SigningRequest::put(
            "acct123.r2.cloudflarestorage.com",
            "/my-games/steam-games.json",
            "application/json",
            "{}",
            parse_iso8601(amz_date)?,
        )?,
        &r2sign_aws_v4::Credential::new("AKIDTEST", "testsecret"),
    )?;
    assert_eq!(
        sent[0].headers()[AUTHORIZATION],
        expected.headers()[AUTHORIZATION]
    );

    Ok(())
}

#[tokio::test]
async fn test_concurrent_uploads_do_not_interfere() -> anyhow::Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "");
    let uploader = uploader(&http);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let uploader = uploader.clone();
        tasks.push(tokio::spawn(async move {
            uploader
                .put_object(&format!("obj-{i}.json"), "application/json", format!("{{\"i\":{i}}}"))
                .await
        }));
    }
    for task in tasks {
        task.await??;
    }

    let sent = http.sent();
    assert_eq!(sent.len(), 8);
    for req in &sent {
        let amz_date = req.headers()["x-amz-date"].to_str()?;
        let expected = RequestSigner::r2().sign(
            SigningRequest::put(
                "acct123.r2.cloudflarestorage.com",
                req.uri().path(),
                "application/json",
                req.body().clone(),
                parse_iso8601(amz_date)?,
            )?,
            &r2sign_aws_v4::Credential::new("AKIDTEST", "testsecret"),
        )?;
        assert_eq!(
            req.headers()[AUTHORIZATION],
            expected.headers()[AUTHORIZATION]
        );
    }

    Ok(())
}
