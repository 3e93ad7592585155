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

//! Resolve the url of an object.
//!
//! Nothing in this module performs network I/O.

use crate::canonical::object_path;
use crate::constants::AWS_URI_ENCODE_SET;
use crate::sign_request::validate_expires;
use crate::{BucketProfile, RequestSigner};
use chrono::TimeDelta;
use http::{Method, Request};
use percent_encoding::utf8_percent_encode;
use r2up_core::time::{now, DateTime};
use r2up_core::{Error, Result, SignRequest, SigningMethod};
use std::time::Duration;

/// A url that embeds a time bounded signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// Absolute url, including the signature query.
    pub url: String,
    /// Instant after which the url is rejected by the store.
    pub expires_at: DateTime,
}

/// Strip leading `/` from a key and reject keys that end up empty.
pub fn normalize_key(key: &str) -> Result<&str> {
    let key = key.trim_start_matches('/');
    if key.is_empty() {
        return Err(Error::request_invalid("object key must not be empty"));
    }
    Ok(key)
}

/// Url of the object on the storage endpoint: `{endpoint}/{bucket}/{key}`.
pub fn endpoint_url(profile: &BucketProfile, key: &str) -> Result<String> {
    let endpoint = profile.endpoint()?;
    let bucket = profile.bucket_name()?;
    let key = normalize_key(key)?;

    Ok(format!("{endpoint}{}", object_path(bucket, key)))
}

/// Permanent url of the object.
///
/// Uses the profile's public url when configured, the endpoint url otherwise.
pub fn public_url(profile: &BucketProfile, key: &str) -> Result<String> {
    match profile.public_url() {
        Some(base) => {
            let key = normalize_key(key)?;
            Ok(format!(
                "{base}/{}",
                utf8_percent_encode(key, &AWS_URI_ENCODE_SET)
            ))
        }
        None => endpoint_url(profile, key),
    }
}

/// Presigned GET url of the object, valid for `expires` from now.
///
/// Always built on the endpoint. The public url is never presigned.
pub fn presigned_url(profile: &BucketProfile, key: &str, expires: Duration) -> Result<PresignedUrl> {
    presigned_url_at(profile, key, expires, now())
}

/// Presigned GET url of the object, signed at `time`.
pub fn presigned_url_at(
    profile: &BucketProfile,
    key: &str,
    expires: Duration,
    time: DateTime,
) -> Result<PresignedUrl> {
    validate_expires(expires)?;
    let url = endpoint_url(profile, key)?;

    let (mut parts, _) = Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(())?
        .into_parts();
    RequestSigner::new(profile.region()).with_time(time).sign_request(
        &mut parts,
        &profile.credential(),
        SigningMethod::Query(expires),
    )?;

    // X-Amz-Expires carries whole seconds only.
    let delta = TimeDelta::from_std(Duration::from_secs(expires.as_secs()))
        .map_err(|e| Error::config_invalid("expires is out of range").with_source(e))?;
    Ok(PresignedUrl {
        url: parts.uri.to_string(),
        expires_at: time + delta,
    })
}
