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

//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, UNSIGNED_PAYLOAD};
use crate::scope::CredentialScope;
use http::{HeaderMap, Method};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use r2up_core::hash::hex_sha256;
use r2up_core::time::{format_date, format_iso8601, DateTime};
use r2up_core::{Error, Result, SigningRequest};
use std::fmt::{Display, Formatter, Write};

/// Per-call values shared by every step of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    /// Signing time, second precision.
    pub time: DateTime,
    /// `YYYYMMDD`
    pub date_stamp: String,
    /// `YYYYMMDDTHHMMSSZ`
    pub amz_date: String,
    /// Hex sha256 of the payload, or `UNSIGNED-PAYLOAD`.
    pub payload_hash: String,
}

impl SigningContext {
    /// Build a context for the given time and payload hash.
    pub fn new(time: DateTime, payload_hash: impl Into<String>) -> Self {
        Self {
            time,
            date_stamp: format_date(time),
            amz_date: format_iso8601(time),
            payload_hash: payload_hash.into(),
        }
    }

    /// Build a context whose payload hash is the sha256 of `payload`.
    pub fn for_payload(time: DateTime, payload: &[u8]) -> Self {
        Self::new(time, hex_sha256(payload))
    }

    /// Build a context for a request whose body is not signed.
    pub fn unsigned(time: DateTime) -> Self {
        Self::new(time, UNSIGNED_PAYLOAD)
    }

    /// Credential scope of this context.
    pub fn scope(&self, region: &str, service: &str) -> CredentialScope {
        CredentialScope::new(&self.date_stamp, region, service)
    }
}

/// CanonicalRequest is the whitespace exact form of a request used as signing input.
///
/// ```text
/// METHOD
/// CANONICAL_URI
/// CANONICAL_QUERY
/// CANONICAL_HEADERS
///
/// SIGNED_HEADERS
/// PAYLOAD_HASH
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: Method,
    uri: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build a canonical request.
    ///
    /// `query` must already be encoded and sorted, see [`canonical_query`].
    /// Every header in `headers` is signed; names are lower-cased and values
    /// trimmed. Insertion order doesn't matter.
    pub fn new(
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        headers: &HeaderMap,
        payload_hash: impl Into<String>,
    ) -> Result<Self> {
        let mut hs = Vec::with_capacity(headers.len());
        for name in headers.keys() {
            // Repeated headers are joined by `,` in the order they were added.
            let mut value = String::new();
            for (idx, v) in headers.get_all(name).iter().enumerate() {
                if idx > 0 {
                    value.push(',');
                }
                value.push_str(v.to_str()?.trim());
            }
            hs.push((name.as_str().to_lowercase(), value));
        }
        hs.sort();

        Ok(Self {
            method,
            uri: canonical_uri(path)?,
            query,
            headers: hs,
            payload_hash: payload_hash.into(),
        })
    }

    /// Build a canonical request from a signing request.
    pub fn from_signing_request(
        req: &SigningRequest,
        payload_hash: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            req.method.clone(),
            &req.path,
            req.query.clone(),
            &req.headers,
            payload_hash,
        )
    }

    /// Canonical uri, already encoded.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// `;` joined sorted list of the signed header names.
    ///
    /// This is exactly the name order used by the canonical headers block.
    pub fn signed_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Hex sha256 of the canonical request string.
    pub fn hash(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(
            f,
            "{}",
            self.query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        )?;
        for (k, v) in &self.headers {
            writeln!(f, "{k}:{v}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Encode a request path into its canonical form.
///
/// The path is decoded first so that an already encoded path is not encoded
/// twice, then every byte except the unreserved set and `/` is encoded.
pub fn canonical_uri(path: &str) -> Result<String> {
    let path = percent_decode_str(path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
    let path = if path.is_empty() { "/".into() } else { path };

    Ok(utf8_percent_encode(&path, &AWS_URI_ENCODE_SET).to_string())
}

/// Build the path of an object in path-style addressing: `/{bucket}/{key}`.
///
/// Each key segment is percent-encoded, `/` separators are kept.
pub fn object_path(bucket: &str, key: &str) -> String {
    let mut s = String::with_capacity(bucket.len() + key.len() + 2);
    s.push('/');
    s.push_str(&utf8_percent_encode(bucket, &AWS_URI_ENCODE_SET).to_string());
    s.push('/');
    // Writing into a String never fails.
    let _ = write!(s, "{}", utf8_percent_encode(key, &AWS_URI_ENCODE_SET));
    s
}

/// Percent-encode query pairs and sort them by encoded name, then value.
///
/// Unreserved characters are preserved and a space encodes as `%20`.
pub fn canonical_query(query: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut query: Vec<_> = query
        .into_iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(&v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    query.sort();
    query
}
