use std::fmt::{Debug, Formatter};

use log::debug;
use r2sign_core::hash::{hex_hmac_sha256, hmac_sha256};
use r2sign_core::{Error, Result};

use crate::constants::{ALGORITHM, AWS4_KEY_PREFIX, AWS4_REQUEST};
use crate::string_to_sign::{CredentialScope, StringToSign};

/// The `kSigning` key derived from a secret access key.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// Every step keys the next one with raw bytes. The key is bound to the scope it
/// was derived for and refuses to sign anything outside of it.
pub struct SigningKey {
    scope: CredentialScope,
    key: Vec<u8>,
}

impl SigningKey {
    /// Derive the signing key for `scope`.
    pub fn derive(secret_access_key: &str, scope: &CredentialScope) -> Result<Self> {
        if secret_access_key.is_empty() {
            return Err(Error::credential_invalid("secret access key is empty"));
        }

        let secret = format!("{AWS4_KEY_PREFIX}{secret_access_key}");
        let k_date = hmac_sha256(secret.as_bytes(), scope.date().as_bytes())?;
        let k_region = hmac_sha256(&k_date, scope.region().as_bytes())?;
        let k_service = hmac_sha256(&k_region, scope.service().as_bytes())?;
        let k_signing = hmac_sha256(&k_service, AWS4_REQUEST.as_bytes())?;

        Ok(Self {
            scope: scope.clone(),
            key: k_signing,
        })
    }

    /// The scope this key was derived for.
    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Sign the string to sign, returning the hex encoded signature.
    pub fn sign(&self, string_to_sign: &StringToSign) -> Result<String> {
        if string_to_sign.scope() != &self.scope {
            return Err(Error::request_invalid(format!(
                "signing key for {} can't sign a request scoped to {}",
                self.scope,
                string_to_sign.scope()
            )));
        }

        hex_hmac_sha256(&self.key, string_to_sign.as_str().as_bytes())
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Assemble the value of the `Authorization` header.
///
/// `AWS4-HMAC-SHA256 Credential={ak}/{scope}, SignedHeaders={a;b}, Signature={hex}`
pub fn authorization_header(
    access_key_id: &str,
    scope: &CredentialScope,
    signed_headers: &[String],
    signature: &str,
) -> String {
    let value = format!(
        "{ALGORITHM} Credential={access_key_id}/{scope}, SignedHeaders={}, Signature={signature}",
        signed_headers.join(";")
    );
    debug!("calculated authorization for scope {scope}");
    value
}
