// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use http::uri::Authority;
use log::debug;
use percent_encoding::utf8_percent_encode;
use r2sign_core::{Context, Error, Result};

use crate::constants::*;

/// Config for the object store an upload targets.
///
/// Config is passed explicitly to the uploader, nothing is read from
/// process-wide state during signing.
#[derive(Clone, Debug)]
pub struct Config {
    /// `account_id` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`R2_ACCOUNT_ID`]
    pub account_id: Option<String>,
    /// `bucket` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`R2_BUCKET`]
    pub bucket: Option<String>,
    /// `storage_host` will be loaded from:
    ///
    /// - env value: [`R2_STORAGE_HOST_ENV`]
    /// - default to: `r2.cloudflarestorage.com`
    pub storage_host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_id: None,
            bucket: None,
            storage_host: R2_STORAGE_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.account_id.is_none() {
            self.account_id = envs.get(R2_ACCOUNT_ID).cloned();
        }
        if self.bucket.is_none() {
            self.bucket = envs.get(R2_BUCKET).cloned();
        }
        if let Some(v) = envs.get(R2_STORAGE_HOST_ENV).filter(|v| !v.is_empty()) {
            self.storage_host = v.to_string();
        }

        debug!("loaded config: {self:?}");
        self
    }

    /// Set the account id.
    pub fn with_account_id(mut self, account_id: &str) -> Self {
        self.account_id = Some(account_id.to_string());
        self
    }

    /// Set the bucket.
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.bucket = Some(bucket.to_string());
        self
    }

    /// Host of the storage endpoint: `{account_id}.{storage_host}`.
    pub fn host(&self) -> Result<String> {
        let account_id = self
            .account_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid(format!("{R2_ACCOUNT_ID} is not set")))?;
        if self.storage_host.is_empty() {
            return Err(Error::config_invalid("storage host is empty"));
        }

        let host = format!("{account_id}.{}", self.storage_host);
        let authority = Authority::try_from(host.as_str()).map_err(|e| {
            Error::config_invalid(format!("invalid storage host {host:?}")).with_source(e)
        })?;
        // Uploads always go over https, `:443` never shows up in the sent `Host`.
        match authority.port_u16() {
            Some(443) => Ok(authority.host().to_string()),
            _ => Ok(host),
        }
    }

    /// The configured bucket.
    pub fn bucket(&self) -> Result<&str> {
        self.bucket
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid(format!("{R2_BUCKET} is not set")))
    }

    /// Percent-encoded URL path of an object: `/{bucket}/{key}`.
    ///
    /// Leading slashes of `key` are ignored, an empty key is rejected.
    pub fn object_path(&self, key: &str) -> Result<String> {
        let bucket = self.bucket()?;
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(Error::request_invalid("object key is empty"));
        }

        Ok(format!(
            "/{}/{}",
            utf8_percent_encode(bucket, &AWS_URI_ENCODE_SET),
            utf8_percent_encode(key, &AWS_URI_ENCODE_SET)
        ))
    }

    /// Full URL of an object: `https://{account_id}.{storage_host}/{bucket}/{key}`.
    pub fn object_url(&self, key: &str) -> Result<String> {
        Ok(format!("https://{}{}", self.host()?, self.object_path(key)?))
    }
}
