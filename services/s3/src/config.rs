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

use crate::constants::{DEFAULT_CONFIG_PATH, R2UP_CONFIG};
use crate::BucketProfile;
use log::debug;
use r2up_core::{Context, Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Config holds every bucket profile known to the command line.
///
/// ```toml
/// default = "blog"
///
/// [buckets.blog]
/// endpoint = "https://<account>.r2.cloudflarestorage.com"
/// access_key_id = "..."
/// secret_access_key = "..."
/// bucket_name = "blog-images"
/// public_url = "https://img.example.com"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Name of the profile used when none is requested.
    #[serde(default)]
    pub default: Option<String>,
    /// Profiles by name.
    #[serde(default)]
    pub buckets: BTreeMap<String, BucketProfile>,
}

impl Config {
    /// Parse config from toml.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config_invalid("failed to parse config").with_source(e))
    }

    /// Load config from `path`, then `R2UP_CONFIG`, then `~/.r2up.toml`.
    pub async fn load(ctx: &Context, path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(v) => v.to_string(),
            None => ctx
                .env_var(R2UP_CONFIG)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
        };
        let path = ctx.expand_home_dir(&path).ok_or_else(|| {
            Error::config_invalid(format!("home dir not found, cannot resolve {path}"))
        })?;
        debug!("loading config from {path}");

        let content = ctx.file_read_to_string(&path).await.map_err(|e| {
            Error::config_invalid(format!("failed to read config {path}")).with_source(e)
        })?;
        Self::parse(&content).map_err(|e| {
            let msg = format!("{} {path}", e.message());
            e.with_message(msg)
        })
    }

    /// Get the profile `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<&BucketProfile> {
        let name = match name.or(self.default.as_deref()) {
            Some(v) => v,
            None => {
                return Err(Error::config_invalid(
                    "no bucket requested and no default bucket configured",
                ))
            }
        };

        self.buckets
            .get(name)
            .ok_or_else(|| Error::config_invalid(format!("bucket profile {name} not found")))
    }
}
