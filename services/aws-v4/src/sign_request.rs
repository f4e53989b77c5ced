use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderValue, Uri};
use log::debug;
use r2sign_core::hash::hex_sha256;
use r2sign_core::time::format_iso8601;
use r2sign_core::utils::Redact;
use r2sign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};

use crate::canonical::CanonicalRequest;
use crate::constants::{R2_REGION, S3_SERVICE, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::signing_key::{authorization_header, SigningKey};
use crate::string_to_sign::{CredentialScope, StringToSign};
use crate::Credential;

/// RequestSigner that implement AWS SigV4 for object uploads.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer holds no credential: it's passed in on every call and dropped
/// together with the derived key once the request is signed.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Signer for R2's S3 compatible API: service `s3`, region `auto`.
    pub fn r2() -> Self {
        Self::new(S3_SERVICE, R2_REGION)
    }

    /// Sign the request and build the request to send.
    ///
    /// The returned request carries `Content-Type`, `x-amz-date`,
    /// `x-amz-content-sha256` and `Authorization`. `host` is signed too, the
    /// transport derives it from the URL authority.
    pub fn sign(&self, req: SigningRequest, cred: &Credential) -> Result<http::Request<Bytes>> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(format!(
                "credential {cred:?} must have both access key id and secret access key"
            )));
        }

        req.validate()?;

        let amz_date = format_iso8601(req.time);
        // Computed once: sent as header and used as the last canonical line.
        let payload_hash = hex_sha256(&req.body);

        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(&req.content_type)?);
        headers.insert(HOST, HeaderValue::from_str(req.authority.as_str())?);
        headers.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload_hash)?);
        headers.insert(X_AMZ_DATE, HeaderValue::from_str(&amz_date)?);

        let creq = CanonicalRequest::build(&req.method, &req.path, &headers, &payload_hash)?;

        // Scope: "20240115/auto/s3/aws4_request"
        let scope = CredentialScope::from_timestamp(&amz_date, &self.region, &self.service)?;
        debug!("calculated scope: {scope}");

        let string_to_sign = StringToSign::build(&amz_date, &scope, &creq)?;
        let signing_key = SigningKey::derive(&cred.secret_access_key, &scope)?;
        let signature = signing_key.sign(&string_to_sign)?;

        let mut authorization = HeaderValue::from_str(&authorization_header(
            &cred.access_key_id,
            &scope,
            creq.signed_headers(),
            &signature,
        ))?;
        authorization.set_sensitive(true);

        headers.remove(HOST);
        headers.insert(AUTHORIZATION, authorization);

        let uri = format!("{}://{}{}", req.scheme, req.authority, creq.uri());
        let uri = Uri::try_from(uri.as_str())?;
        debug!(
            "signed {} {uri} for access key {:?}",
            req.method,
            Redact::from(&cred.access_key_id)
        );

        let mut signed = http::Request::new(req.body);
        *signed.method_mut() = req.method;
        *signed.uri_mut() = uri;
        *signed.headers_mut() = headers;
        Ok(signed)
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: SigningRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<http::Request<Bytes>> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no credential provided, refuse to build an unsigned request",
            ));
        };

        self.sign(req, cred)
    }
}
