use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, warn};
use r2sign_core::time::now;
use r2sign_core::{
    Context, Error, ProvideCredential, Result, SignRequest, SigningCredential, SigningRequest,
};

use crate::{Config, Credential, RequestSigner};

/// Uploader signs a `PUT` object request and sends it through the context's transport.
///
/// Credentials are loaded from the provider on every upload and dropped as
/// soon as the request is signed. Nothing is retried: a failed upload is
/// returned to the caller as is.
#[derive(Clone)]
pub struct Uploader {
    ctx: Context,
    config: Config,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    signer: RequestSigner,
}

impl Debug for Uploader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("config", &self.config)
            .field("provider", &self.provider)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl Uploader {
    /// Create a new uploader.
    pub fn new(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        Self {
            ctx,
            config,
            provider: Arc::new(provider),
            signer: RequestSigner::r2(),
        }
    }

    /// Upload `body` as object `key`.
    ///
    /// - Signing failures ([`Error::is_signing_error`]) are returned before anything is sent.
    /// - A non-2xx answer is returned as [`r2sign_core::ErrorKind::UploadFailed`] with status and body.
    pub async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<()> {
        let host = self.config.host()?;
        let path = self.config.object_path(key)?;

        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .filter(|cred| cred.is_valid())
            .ok_or_else(|| {
                Error::credential_invalid(format!(
                    "no valid credential loaded by {:?}",
                    self.provider
                ))
            })?;

        let req = SigningRequest::put(&host, path, content_type, body, now())?;
        let signed = self
            .signer
            .sign_request(&self.ctx, req, Some(&cred))
            .await?;
        drop(cred);

        let url = signed.uri().to_string();
        let resp = self.ctx.http_send(signed).await?;

        let status = resp.status();
        if status.is_success() {
            debug!("uploaded {url} with status {status}");
            return Ok(());
        }

        let body = String::from_utf8_lossy(resp.body()).into_owned();
        warn!("upload {url} failed with status {status}: {body}");
        Err(Error::upload_failed(status, body))
    }
}
