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

use crate::constants::{DEFAULT_TIMEOUT, X_AMZ_CONTENT_SHA_256};
use crate::error::provider_error;
use crate::sign_request::validate_expires;
use crate::url::{endpoint_url, normalize_key, presigned_url, public_url};
use crate::{BucketProfile, RequestSigner};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use log::{debug, info};
use r2up_core::hash::hex_sha256;
use r2up_core::time::{now, DateTime};
use r2up_core::{Context, Error, Result, SignRequest, SigningCredential, SigningMethod};
use std::time::Duration;

/// An object to upload.
///
/// The payload is held in memory for the whole upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    key: String,
    payload: Bytes,
    content_type: String,
    cache_control: Option<String>,
    content_disposition: Option<String>,
}

impl UploadRequest {
    /// Create a new upload request.
    ///
    /// A leading `/` in `key` is ignored.
    pub fn new(
        key: impl Into<String>,
        payload: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
            content_type: content_type.into(),
            cache_control: None,
            content_disposition: None,
        }
    }

    /// Set the `Cache-Control` sent along with the object.
    pub fn with_cache_control(mut self, v: impl Into<String>) -> Self {
        self.cache_control = Some(v.into());
        self
    }

    /// Set the `Content-Disposition` sent along with the object.
    pub fn with_content_disposition(mut self, v: impl Into<String>) -> Self {
        self.content_disposition = Some(v.into());
        self
    }

    /// Object key, without leading `/`.
    pub fn key(&self) -> &str {
        self.key.trim_start_matches('/')
    }

    /// Payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Content type of the payload.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// How the url returned for an uploaded object can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Permanent url, see [`public_url`].
    Public,
    /// Presigned GET url valid for the given duration.
    Temporary(Duration),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    /// Key the object was stored under.
    pub key: String,
    /// Url to retrieve the object.
    pub url: String,
    /// Expiry of `url`, only set for [`Visibility::Temporary`].
    pub expires_at: Option<DateTime>,
}

/// Build the signed PUT request of an upload.
///
/// The signed header set is exactly `content-type`, `host`,
/// `x-amz-content-sha256` and `x-amz-date`. `Content-Length`,
/// `Cache-Control` and `Content-Disposition` are added unsigned.
pub fn signed_put_request(
    profile: &BucketProfile,
    req: &UploadRequest,
    time: DateTime,
) -> Result<Request<Bytes>> {
    let url = endpoint_url(profile, req.key())?;

    let (mut parts, body) = Request::builder()
        .method(Method::PUT)
        .uri(url)
        .header(header::CONTENT_TYPE, req.content_type())
        .header(X_AMZ_CONTENT_SHA_256, hex_sha256(req.payload()))
        .body(req.payload().clone())?
        .into_parts();

    let output = RequestSigner::new(profile.region())
        .with_time(time)
        .sign_request(&mut parts, &profile.credential(), SigningMethod::Header)?;
    debug!("signed put request with headers: {}", output.signed_headers);

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    if let Some(v) = &req.cache_control {
        parts
            .headers
            .insert(header::CACHE_CONTROL, HeaderValue::from_str(v)?);
    }
    if let Some(v) = &req.content_disposition {
        parts
            .headers
            .insert(header::CONTENT_DISPOSITION, HeaderValue::from_str(v)?);
    }

    Ok(Request::from_parts(parts, body))
}

/// Run every check of an upload that needs no network I/O.
///
/// Rejects an out of range expiry, a profile without endpoint, bucket or
/// credentials, and an empty key. Returns the permanent url of the object.
pub fn preflight(profile: &BucketProfile, key: &str, visibility: Visibility) -> Result<String> {
    if let Visibility::Temporary(expires) = visibility {
        validate_expires(expires)?;
    }
    endpoint_url(profile, key)?;
    if !profile.credential().is_valid() {
        return Err(Error::config_invalid(
            "access_key_id and secret_access_key are required for signing",
        ));
    }
    public_url(profile, key)
}

/// Uploader stores payloads into a bucket and resolves their urls.
///
/// Every call makes exactly one attempt; nothing is retried.
#[derive(Debug, Clone)]
pub struct Uploader {
    ctx: Context,
    timeout: Duration,
}

impl Uploader {
    /// Create a new uploader over the given context.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the timeout applied to every request, 60 seconds by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Context used to send requests.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Put the payload under its key.
    ///
    /// Only `200 OK` is a success; any other status is returned as a
    /// provider error carrying the status and raw body.
    pub async fn put_object(&self, profile: &BucketProfile, req: &UploadRequest) -> Result<()> {
        let bucket = profile.bucket_name()?;
        let key = normalize_key(req.key())?;
        let http_req = signed_put_request(profile, req, now())?;

        let resp = self.send(http_req).await?;
        if resp.status() != StatusCode::OK {
            let (parts, body) = resp.into_parts();
            return Err(provider_error(parts.status, body));
        }

        info!(
            "uploaded {} bytes to {bucket}/{key}",
            req.payload().len()
        );
        Ok(())
    }

    /// Upload the payload and return the url for the requested visibility.
    ///
    /// All configuration, including the expiry of a temporary url, is
    /// validated before the request is sent.
    pub async fn upload(
        &self,
        profile: &BucketProfile,
        req: &UploadRequest,
        visibility: Visibility,
    ) -> Result<UploadedObject> {
        let url = preflight(profile, req.key(), visibility)?;

        self.put_object(profile, req).await?;

        let key = req.key().to_string();
        match visibility {
            Visibility::Public => Ok(UploadedObject {
                key,
                url,
                expires_at: None,
            }),
            Visibility::Temporary(expires) => {
                let presigned = presigned_url(profile, &key, expires)?;
                Ok(UploadedObject {
                    key,
                    url: presigned.url,
                    expires_at: Some(presigned.expires_at),
                })
            }
        }
    }

    /// Upload requests one by one, stopping at the first failure.
    pub async fn upload_batch(
        &self,
        profile: &BucketProfile,
        reqs: impl IntoIterator<Item = UploadRequest>,
        visibility: Visibility,
    ) -> Result<Vec<UploadedObject>> {
        let mut uploaded = Vec::new();
        for req in reqs {
            uploaded.push(self.upload(profile, &req, visibility).await?);
        }
        Ok(uploaded)
    }

    /// Send one request within the configured timeout.
    pub(crate) async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        tokio::time::timeout(self.timeout, self.ctx.http_send(req))
            .await
            .map_err(|e| {
                Error::transport(format!(
                    "{method} {uri} timed out after {:?}",
                    self.timeout
                ))
                .with_source(e)
            })?
    }
}
