//! Canonical request of [SigV4](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request).

use std::fmt::{Display, Formatter, Write};

use http::{HeaderMap, Method};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use r2sign_core::hash::hex_sha256;
use r2sign_core::{Error, Result};

use crate::constants::AWS_URI_ENCODE_SET;

/// The deterministic text form of a request that gets hashed and signed.
///
/// ```text
/// PUT
/// /my-games/steam-games.json
///
/// content-type:application/json
/// host:acct123.r2.cloudflarestorage.com
/// x-amz-content-sha256:015abd7f...
/// x-amz-date:20240115T120000Z
///
/// content-type;host;x-amz-content-sha256;x-amz-date
/// 015abd7f...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    request: String,
    uri: String,
    signed_headers: Vec<String>,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// - `uri_path` may already be percent-encoded, it's decoded first so it's never encoded twice.
    /// - The query string is always empty: uploads never carry query parameters.
    /// - Every header in `headers` is signed, ordered by lower-cased name.
    /// - `payload_hash` is the hex SHA256 of the body, the same value sent in `x-amz-content-sha256`.
    pub fn build(
        method: &Method,
        uri_path: &str,
        headers: &HeaderMap,
        payload_hash: &str,
    ) -> Result<Self> {
        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);

        writeln!(f, "{method}")?;

        let path = percent_decode_str(uri_path).decode_utf8().map_err(|e| {
            Error::request_invalid(format!("failed to decode path {uri_path:?}")).with_source(e)
        })?;
        let uri = utf8_percent_encode(&path, &AWS_URI_ENCODE_SET).to_string();
        writeln!(f, "{uri}")?;

        // Query
        writeln!(f)?;

        let signed_headers = sorted_header_names(headers);
        for name in &signed_headers {
            let mut values = Vec::with_capacity(1);
            for value in headers.get_all(name.as_str()) {
                values.push(value.to_str()?.trim_matches(' '));
            }
            writeln!(f, "{}:{}", name, values.join(","))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", signed_headers.join(";"))?;
        write!(f, "{payload_hash}")?;

        debug!("calculated canonical request: {f}");
        Ok(Self {
            request: f,
            uri,
            signed_headers,
        })
    }

    /// The canonical request text.
    pub fn as_str(&self) -> &str {
        &self.request
    }

    /// The canonical URI, the path the request must be sent to.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Lower-cased header names covered by the signature, in canonical order.
    pub fn signed_headers(&self) -> &[String] {
        &self.signed_headers
    }

    /// Hex SHA256 of the canonical request text, the last line of the string to sign.
    pub fn hex_sha256(&self) -> String {
        hex_sha256(self.request.as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.request)
    }
}

fn sorted_header_names(headers: &HeaderMap) -> Vec<String> {
    // HeaderName is always stored lower-cased.
    let mut names = headers
        .keys()
        .map(|k| k.as_str().to_string())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names
}
