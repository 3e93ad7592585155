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

use bytes::Bytes;
use http::StatusCode;
use quick_xml::de;
use r2up_core::Error;
use serde::Deserialize;

/// Error document returned by S3-compatible stores.
///
/// ```xml
/// <Error>
///   <Code>AccessDenied</Code>
///   <Message>Access Denied</Message>
/// </Error>
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ErrorDocument {
    /// Machine readable error code.
    pub code: String,
    /// Human readable message.
    pub message: String,
}

impl ErrorDocument {
    /// Parse an error document, returning `None` for anything that isn't one.
    pub fn parse(body: &str) -> Option<Self> {
        let doc: Self = de::from_str(body).ok()?;
        if doc.code.is_empty() {
            return None;
        }
        Some(doc)
    }
}

/// Build a provider error from a non-success response.
///
/// The raw body is always kept verbatim; the error code is added to the
/// message when the body is a well formed error document.
pub fn provider_error(status: StatusCode, body: Bytes) -> Error {
    let body = String::from_utf8_lossy(&body).into_owned();
    let doc = ErrorDocument::parse(&body);

    let err = Error::provider(status, body.as_str());
    match doc {
        Some(doc) if doc.message.is_empty() => err.with_message(format!(
            "unexpected status {} ({}): {body}",
            status.as_u16(),
            doc.code
        )),
        Some(doc) => err.with_message(format!(
            "unexpected status {} ({}: {}): {body}",
            status.as_u16(),
            doc.code,
            doc.message
        )),
        None => err,
    }
}
