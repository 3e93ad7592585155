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

use crate::canonical::{canonical_query, CanonicalRequest, SigningContext};
use crate::constants::{
    AWS4_HMAC_SHA256, MAX_PRESIGN_EXPIRES, S3_SERVICE, UNSIGNED_PAYLOAD, X_AMZ_ALGORITHM,
    X_AMZ_CONTENT_SHA_256, X_AMZ_CREDENTIAL, X_AMZ_DATE, X_AMZ_DATE_QUERY, X_AMZ_EXPIRES,
    X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::Credential;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use r2up_core::hash::hex_hmac_sha256;
use r2up_core::time::{format_iso8601, now, DateTime};
use r2up_core::{Error, Result, SignRequest, SigningCredential, SigningMethod, SigningRequest};
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner that implement AWS SigV4 for S3-compatible stores.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
/// - [Authenticating requests: using query parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
///
/// Every header present on the request is signed. Callers control the signed
/// set by only adding unsigned headers after signing.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the `s3` service in the given region.
    pub fn new(region: &str) -> Self {
        Self {
            service: S3_SERVICE.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or for reproducing a signature.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

/// Intermediate values of one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    /// The canonical request string.
    pub canonical_request: String,
    /// The string to sign.
    pub string_to_sign: String,
    /// Hex encoded signature.
    pub signature: String,
    /// `;` joined signed header names.
    pub signed_headers: String,
    /// Time used for signing.
    pub time: DateTime,
}

impl SignRequest for RequestSigner {
    type Credential = Credential;
    type Output = SigningOutput;

    fn sign_request(
        &self,
        req: &mut Parts,
        cred: &Self::Credential,
        method: SigningMethod,
    ) -> Result<SigningOutput> {
        if !cred.is_valid() {
            return Err(Error::config_invalid(
                "access_key_id and secret_access_key are required for signing",
            ));
        }
        if let SigningMethod::Query(expires) = method {
            validate_expires(expires)?;
        }

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        // canonicalize context
        canonicalize_header(&mut signed_req, method, now)?;
        let ctx = SigningContext::new(now, payload_hash(&signed_req, method)?);
        let scope = ctx.scope(&self.region, &self.service);
        debug!("calculated scope: {scope}");
        canonicalize_query(&mut signed_req, cred, method, &ctx, &scope.to_string());

        // build canonical request and string to sign.
        let creq = CanonicalRequest::from_signing_request(&signed_req, &ctx.payload_hash)?;
        let canonical_request = creq.to_string();
        debug!("calculated canonical request: {canonical_request}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{AWS4_HMAC_SHA256}")?;
            writeln!(f, "{}", ctx.amz_date)?;
            writeln!(f, "{scope}")?;
            write!(f, "{}", creq.hash())?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = scope.signing_key(&cred.secret_access_key)?;
        let signature = hex_hmac_sha256(signing_key.as_bytes(), string_to_sign.as_bytes());
        let signed_headers = creq.signed_headers();

        match method {
            SigningMethod::Query(_) => {
                signed_req.query_push(X_AMZ_SIGNATURE, signature.clone());
            }
            SigningMethod::Header => {
                let mut authorization = HeaderValue::from_str(&format!(
                    "{AWS4_HMAC_SHA256} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                    cred.access_key_id,
                ))
                .map_err(|e| {
                    Error::config_invalid("access_key_id is not a valid header value")
                        .with_source(e)
                })?;
                authorization.set_sensitive(true);

                signed_req
                    .headers
                    .insert(header::AUTHORIZATION, authorization);
            }
        }

        // Apply to the request.
        signed_req.apply(req)?;

        Ok(SigningOutput {
            canonical_request,
            string_to_sign,
            signature,
            signed_headers,
            time: now,
        })
    }
}

/// Check that a presign expiry is within `1..=604800` seconds.
pub fn validate_expires(expires: Duration) -> Result<()> {
    if expires.as_secs() == 0 || expires > MAX_PRESIGN_EXPIRES {
        return Err(Error::config_invalid(format!(
            "expires must be between 1 and {} seconds, got {}",
            MAX_PRESIGN_EXPIRES.as_secs(),
            expires.as_secs_f64()
        )));
    }
    Ok(())
}

/// Convert a user supplied expiry in seconds, rejecting negative and out of
/// range values.
pub fn expires_from_secs(secs: i64) -> Result<Duration> {
    let expires = u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| Error::config_invalid(format!("expires must not be negative, got {secs}")))?;
    validate_expires(expires)?;
    Ok(expires)
}

fn payload_hash(req: &SigningRequest, method: SigningMethod) -> Result<String> {
    match method {
        SigningMethod::Query(_) => Ok(UNSIGNED_PAYLOAD.to_string()),
        SigningMethod::Header => match req.headers.get(X_AMZ_CONTENT_SHA_256) {
            Some(v) => Ok(v.to_str()?.to_string()),
            None => Ok(UNSIGNED_PAYLOAD.to_string()),
        },
    }
}

fn canonicalize_header(
    req: &mut SigningRequest,
    method: SigningMethod,
    now: DateTime,
) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in req.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        req.headers
            .insert(header::HOST, req.authority.as_str().parse()?);
    }

    if method == SigningMethod::Header {
        // Insert DATE header if not present.
        if req.headers.get(X_AMZ_DATE).is_none() {
            req.headers
                .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
        }

        // Insert X_AMZ_CONTENT_SHA_256 header if not present.
        if req.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
            req.headers.insert(
                X_AMZ_CONTENT_SHA_256,
                HeaderValue::from_static(UNSIGNED_PAYLOAD),
            );
        }
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    cred: &Credential,
    method: SigningMethod,
    ctx: &SigningContext,
    scope: &str,
) {
    if let SigningMethod::Query(expires) = method {
        req.query_push(X_AMZ_ALGORITHM, AWS4_HMAC_SHA256);
        req.query_push(
            X_AMZ_CREDENTIAL,
            format!("{}/{scope}", cred.access_key_id),
        );
        req.query_push(X_AMZ_DATE_QUERY, ctx.amz_date.clone());
        req.query_push(X_AMZ_EXPIRES, expires.as_secs().to_string());
        req.query_push(
            X_AMZ_SIGNED_HEADERS,
            req.header_name_to_vec_sorted().join(";"),
        );
    }

    // Return if query is empty.
    if req.query.is_empty() {
        return;
    }

    req.query = canonical_query(std::mem::take(&mut req.query));
}
