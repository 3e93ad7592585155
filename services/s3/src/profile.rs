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

use crate::constants::DEFAULT_REGION;
use crate::Credential;
use http::Uri;
use r2up_core::utils::Redacted;
use r2up_core::{Error, Result};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// BucketProfile identifies one storage destination: where it lives and how
/// to authenticate against it.
///
/// A profile is loaded once and then passed by reference into every signing,
/// upload and url operation. Nothing mutates it after load.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BucketProfile {
    /// Base url of the storage service, for example `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Bucket that objects are written into.
    pub bucket_name: String,
    /// Signing region, `auto` when absent.
    #[serde(default)]
    pub region: Option<String>,
    /// CDN or custom domain that serves public objects.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl BucketProfile {
    /// Create a new profile without region or public url.
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket_name: bucket_name.into(),
            region: None,
            public_url: None,
        }
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the public url.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into());
        self
    }

    /// Signing region of this profile.
    pub fn region(&self) -> &str {
        match self.region.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => DEFAULT_REGION,
        }
    }

    /// Endpoint without trailing slashes.
    ///
    /// Returns a config error if the endpoint is empty or is not an absolute
    /// `http`/`https` url.
    pub fn endpoint(&self) -> Result<&str> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(Error::config_invalid("endpoint is required"));
        }

        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint} is not a valid url")).with_source(e)
        })?;
        match (uri.scheme_str(), uri.authority()) {
            (Some("http" | "https"), Some(_)) => Ok(endpoint),
            _ => Err(Error::config_invalid(format!(
                "endpoint {endpoint} must be an absolute http or https url"
            ))),
        }
    }

    /// Public url without trailing slashes, if configured and not blank.
    pub fn public_url(&self) -> Option<&str> {
        self.public_url
            .as_deref()
            .map(|v| v.trim().trim_end_matches('/'))
            .filter(|v| !v.is_empty())
    }

    /// Bucket name, required to build any object path.
    pub fn bucket_name(&self) -> Result<&str> {
        let bucket = self.bucket_name.trim();
        if bucket.is_empty() {
            return Err(Error::config_invalid("bucket_name is required"));
        }
        Ok(bucket)
    }

    /// Credential used to sign requests for this profile.
    pub fn credential(&self) -> Credential {
        Credential::new(
            self.access_key_id.trim(),
            self.secret_access_key.trim(),
        )
    }
}

impl Debug for BucketProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketProfile")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &Redacted::KeyId(&self.access_key_id))
            .field("secret_access_key", &Redacted::Secret(&self.secret_access_key))
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("public_url", &self.public_url)
            .finish()
    }
}
