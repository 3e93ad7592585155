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

//! Upload objects to S3-compatible storage with AWS SigV4.
//!
//! This crate re-exports [`r2up_core`] and, under [`s3`], the signer and
//! uploader from `r2up-s3`, together with a ready to use [`default_context`].

pub use r2up_core::*;

/// Signing and upload for S3-compatible stores.
pub mod s3 {
    pub use r2up_s3::*;
}

use r2up_file_read_tokio::TokioFileRead;
use r2up_http_send_reqwest::ReqwestHttpSend;

/// User agent sent on requests to the store.
pub const USER_AGENT: &str = concat!("r2up/", env!("CARGO_PKG_VERSION"));

/// Build a context backed by tokio file reads, a reqwest client and the OS
/// environment.
pub fn default_context() -> Result<Context> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::unexpected("failed to build http client").with_source(e))?;

    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(OsEnv))
}
