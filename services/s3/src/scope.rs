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

//! Credential scope and signing key derivation.

use crate::constants::AWS4_REQUEST;
use r2up_core::hash::hmac_sha256;
use r2up_core::{Error, Result};
use std::fmt::{Debug, Display, Formatter};

/// Scope that a signature is valid for: `20130524/us-east-1/s3/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date_stamp: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Create a new scope from a `YYYYMMDD` date stamp, region and service.
    pub fn new(
        date_stamp: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            date_stamp: date_stamp.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Derive the signing key of this scope for the given secret.
    pub fn signing_key(&self, secret: &str) -> Result<SigningKey> {
        generate_signing_key(secret, &self.date_stamp, &self.region, &self.service)
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date_stamp, self.region, self.service, AWS4_REQUEST
        )
    }
}

/// SigningKey is the 32 byte HMAC key derived for one date, region and service.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

/// Derive the SigV4 signing key.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, dateStamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// Only an empty secret is rejected; every other input is accepted as is.
pub fn generate_signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<SigningKey> {
    if secret.is_empty() {
        return Err(Error::config_invalid(
            "secret_access_key is required to derive signing key",
        ));
    }

    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(&sign_date, region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(&sign_region, service.as_bytes());
    // Sign request
    let sign_request = hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes());

    Ok(SigningKey(sign_request))
}
