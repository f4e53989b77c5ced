use bytes::Bytes;
use http::uri::Authority;
use http::uri::Scheme;
use http::Method;

use crate::time::DateTime;
use crate::{Error, Result};

/// Signing request for a single object upload.
///
/// The value is built fresh for every upload and consumed by the signer.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method, always `PUT`.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority, also used as the signed `host` header.
    pub authority: Authority,
    /// Percent-encoded URL path: `/{bucket}/{object_key}`.
    pub path: String,
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// Raw body bytes.
    pub body: Bytes,
    /// Wall-clock time at signing.
    pub time: DateTime,
}

impl SigningRequest {
    /// Build a `PUT` request for `https://{host}{path}`.
    pub fn put(
        host: &str,
        path: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
        time: DateTime,
    ) -> Result<Self> {
        if host.is_empty() {
            return Err(Error::request_invalid("request without host is invalid for signing"));
        }
        let authority = Authority::try_from(host).map_err(|e| {
            Error::request_invalid(format!("invalid host {host:?}")).with_source(e)
        })?;
        // The transport omits the default https port from `Host`, the signed value must match.
        let authority = match authority.port_u16() {
            Some(443) => Authority::try_from(authority.host())?,
            _ => authority,
        };

        let path = path.into();
        check_object_path(&path)?;

        Ok(Self {
            method: Method::PUT,
            scheme: Scheme::HTTPS,
            authority,
            path,
            content_type: content_type.into(),
            body: body.into(),
            time,
        })
    }

    /// Check that the request still addresses a single object.
    ///
    /// Fields are public, so signers call this again before signing.
    pub fn validate(&self) -> Result<()> {
        if self.method != Method::PUT {
            return Err(Error::request_invalid(format!(
                "only PUT is supported, got {}",
                self.method
            )));
        }
        check_object_path(&self.path)
    }

    /// Full request URL.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.authority, self.path)
    }
}

/// `/{bucket}/{key}`: `PUT /{bucket}` or `PUT /{bucket}/` would create a bucket instead.
fn check_object_path(path: &str) -> Result<()> {
    let valid = match path.strip_prefix('/').and_then(|v| v.split_once('/')) {
        Some((bucket, key)) => !bucket.is_empty() && !key.trim_matches('/').is_empty(),
        None => false,
    };
    if !valid {
        return Err(Error::request_invalid(format!(
            "request path {path:?} must be /{{bucket}}/{{key}} with non-empty bucket and key"
        )));
    }
    Ok(())
}
