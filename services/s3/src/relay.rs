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

//! Fetch a remote resource and store it in a bucket.

use crate::constants::RELAY_USER_AGENT;
use crate::content_type::{basename, infer_content_type};
use crate::error::provider_error;
use crate::key::random_key;
use crate::upload::preflight;
use crate::{BucketProfile, UploadRequest, UploadedObject, Uploader, Visibility};
use bytes::Bytes;
use http::{header, Method, Request, StatusCode, Uri};
use log::{debug, info};
use r2up_core::{Error, Result};

/// A resource downloaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Body of the response.
    pub body: Bytes,
    /// `Content-Type` of the response, if any.
    pub content_type: Option<String>,
}

impl Uploader {
    /// Download `url` entirely into memory.
    ///
    /// Transport failures and any status other than `200 OK` are errors.
    pub async fn fetch(&self, url: &str) -> Result<Fetched> {
        let uri: Uri = url.parse()?;
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::USER_AGENT, RELAY_USER_AGENT)
            .body(Bytes::new())?;

        let resp = self.send(req).await.map_err(|err| {
            let msg = format!("failed to fetch {url}: {}", err.message());
            err.with_message(msg)
        })?;
        let (parts, body) = resp.into_parts();
        if parts.status != StatusCode::OK {
            let err = provider_error(parts.status, body);
            let msg = format!("failed to fetch {url}: {}", err.message());
            return Err(err.with_message(msg));
        }

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        debug!("fetched {} bytes from {url}", body.len());

        Ok(Fetched { body, content_type })
    }

    /// Download `url` and upload it.
    ///
    /// The key defaults to `{token}/{basename of the url path}`. Nothing is
    /// downloaded when the upload is bound to fail on configuration, and
    /// nothing is uploaded when the download fails.
    pub async fn fetch_and_upload(
        &self,
        profile: &BucketProfile,
        url: &str,
        key: Option<&str>,
        visibility: Visibility,
    ) -> Result<UploadedObject> {
        let uri: Uri = url.parse().map_err(|e| {
            Error::request_invalid(format!("source url {url} is invalid")).with_source(e)
        })?;
        let key = match key {
            Some(key) => key.to_string(),
            None => random_key(basename(uri.path())),
        };

        preflight(profile, &key, visibility)?;

        let fetched = self.fetch(url).await?;
        let content_type = fetched
            .content_type
            .unwrap_or_else(|| infer_content_type(&key).to_string());

        let req = UploadRequest::new(key, fetched.body, content_type);
        let uploaded = self.upload(profile, &req, visibility).await?;
        info!("relayed {url} to {}", uploaded.key);
        Ok(uploaded)
    }
}
