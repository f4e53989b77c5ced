//! AWS SigV4 signer for uploads to R2 and other S3 compatible stores.
//!
//! The signing pipeline is split into four stages:
//!
//! 1. [`CanonicalRequest`]: the canonical form of the request
//! 2. [`StringToSign`]: algorithm, timestamp, [`CredentialScope`] and the canonical request hash
//! 3. [`SigningKey`]: the date scoped key derived from the secret access key
//! 4. [`authorization_header`]: the final `Authorization` header value
//!
//! [`RequestSigner`] runs them in order for a [`SigningRequest`](r2sign_core::SigningRequest),
//! and [`Uploader`] sends the signed request.
//!
//! ## Example
//!
//! ```no_run
//! use r2sign_aws_v4::{Config, EnvCredentialProvider, Uploader};
//! use r2sign_core::{Context, OsEnv};
//! use r2sign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> r2sign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_http_send(ReqwestHttpSend::default());
//! let config = Config::default().from_env(&ctx);
//!
//! let uploader = Uploader::new(ctx, config, EnvCredentialProvider::new());
//! uploader
//!     .put_object("steam-games.json", "application/json", r#"{"games":[]}"#)
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{EMPTY_STRING_SHA256, R2_REGION, S3_SERVICE};

mod canonical;
pub use canonical::CanonicalRequest;
mod string_to_sign;
pub use string_to_sign::{CredentialScope, StringToSign};
mod signing_key;
pub use signing_key::{authorization_header, SigningKey};
mod sign_request;
pub use sign_request::RequestSigner;

mod credential;
pub use credential::Credential;
mod provide_credential;
pub use provide_credential::{EnvCredentialProvider, StaticCredentialProvider};

mod config;
pub use config::Config;
mod upload;
pub use upload::Uploader;
