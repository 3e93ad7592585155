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

mod config;
mod relay;
mod upload;

use r2up_core::Context;
use r2up_http_send_reqwest::ReqwestHttpSend;
use r2up_s3::{BucketProfile, Uploader};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn uploader() -> Uploader {
    init_logger();
    Uploader::new(Context::new().with_http_send(ReqwestHttpSend::default()))
}

fn profile(server: &mockito::ServerGuard) -> BucketProfile {
    BucketProfile::new(server.url(), "ak", "sk", "b")
}
