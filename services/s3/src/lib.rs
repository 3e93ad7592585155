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

//! AWS SigV4 signing and object upload for S3-compatible stores.
//!
//! Works with Cloudflare R2, AWS S3, MinIO and any other store that speaks
//! the S3 `PutObject` API with Signature Version 4.
//!
//! ## Example
//!
//! ```no_run
//! use r2up_core::{Context, OsEnv};
//! use r2up_file_read_tokio::TokioFileRead;
//! use r2up_http_send_reqwest::ReqwestHttpSend;
//! use r2up_s3::{BucketProfile, UploadRequest, Uploader, Visibility};
//!
//! # async fn example() -> r2up_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let profile = BucketProfile::new(
//!     "https://<account>.r2.cloudflarestorage.com",
//!     "access_key_id",
//!     "secret_access_key",
//!     "blog-images",
//! )
//! .with_public_url("https://img.example.com");
//!
//! let req = UploadRequest::new("img/a.jpg", std::fs::read("a.jpg")?, "image/jpeg");
//! let uploaded = Uploader::new(ctx)
//!     .upload(&profile, &req, Visibility::Public)
//!     .await?;
//! println!("{}", uploaded.url);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod canonical;
pub mod constants;
pub mod content_type;
pub mod key;
pub mod url;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod error;
pub use error::{provider_error, ErrorDocument};

mod profile;
pub use profile::BucketProfile;

mod relay;
pub use relay::Fetched;

mod scope;
pub use scope::{generate_signing_key, CredentialScope, SigningKey};

mod sign_request;
pub use sign_request::{expires_from_secs, validate_expires, RequestSigner, SigningOutput};

mod upload;
pub use upload::{preflight, signed_put_request, UploadRequest, UploadedObject, Uploader, Visibility};
