use std::fmt::{Display, Formatter, Write};

use log::debug;
use r2sign_core::{Error, Result};

use crate::canonical::CanonicalRequest;
use crate::constants::{ALGORITHM, AWS4_REQUEST};

/// Scope a derived key is valid for: `20240115/auto/s3/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Create a scope for the given `YYYYMMDD` date stamp.
    pub fn new(date: &str, region: &str, service: &str) -> Self {
        Self {
            date: date.to_string(),
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Create a scope from a `YYYYMMDDTHHMMSSZ` timestamp, using its first 8 characters as date.
    pub fn from_timestamp(amz_timestamp: &str, region: &str, service: &str) -> Result<Self> {
        let date = amz_timestamp
            .get(..8)
            .filter(|v| v.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                Error::request_invalid(format!(
                    "timestamp {amz_timestamp:?} doesn't start with a YYYYMMDD date"
                ))
            })?;

        Ok(Self::new(date, region, service))
    }

    /// The `YYYYMMDD` date stamp.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The signing service.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, AWS4_REQUEST
        )
    }
}

/// The string that gets HMAC'ed with the signing key.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20240115T120000Z
/// 20240115/auto/s3/aws4_request
/// <hex sha256 of canonical request>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToSign {
    scope: CredentialScope,
    value: String,
}

impl StringToSign {
    /// Build the string to sign for a canonical request.
    ///
    /// The timestamp must fall on the scope's date.
    pub fn build(
        amz_timestamp: &str,
        scope: &CredentialScope,
        canonical_request: &CanonicalRequest,
    ) -> Result<Self> {
        if !amz_timestamp.starts_with(scope.date()) {
            return Err(Error::request_invalid(format!(
                "timestamp {amz_timestamp} is outside of credential scope {scope}"
            )));
        }

        let mut f = String::with_capacity(128);
        writeln!(f, "{ALGORITHM}")?;
        writeln!(f, "{amz_timestamp}")?;
        writeln!(f, "{scope}")?;
        write!(f, "{}", canonical_request.hex_sha256())?;

        debug!("calculated string to sign: {f}");
        Ok(Self {
            scope: scope.clone(),
            value: f,
        })
    }

    /// The credential scope embedded in this string.
    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    /// The string to sign text.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for StringToSign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
