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

use crate::args::{Cli, Commands, UrlArgs};
use log::debug;
use r2up::s3::content_type::infer_content_type;
use r2up::s3::key::batch_key;
use r2up::s3::{
    expires_from_secs, url::presigned_url, Config, UploadRequest, UploadedObject, Uploader,
    Visibility,
};
use r2up::time::format_rfc3339;
use r2up::{Context, Error, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// One printed line of output.
#[derive(Debug, Serialize)]
struct Record {
    key: String,
    url: String,
    expires_at: Option<String>,
}

impl From<UploadedObject> for Record {
    fn from(v: UploadedObject) -> Self {
        Self {
            key: v.key,
            url: v.url,
            expires_at: v.expires_at.map(format_rfc3339),
        }
    }
}

pub async fn run(ctx: Context, cli: Cli) -> Result<()> {
    let config = Config::load(&ctx, cli.config.as_deref()).await?;
    let profile = config.profile(cli.bucket.as_deref())?;
    let uploader = Uploader::new(ctx).with_timeout(Duration::from_secs(cli.timeout));

    let records: Vec<Record> = match cli.command {
        Commands::Put {
            files,
            key,
            prefix,
            url,
        } => {
            let visibility = visibility(url)?;
            if key.is_some() && files.len() > 1 {
                return Err(Error::config_invalid("--key can only be used with a single file"));
            }

            let mut reqs = Vec::with_capacity(files.len());
            for file in &files {
                let name = file_name(file)?;
                let key = key
                    .clone()
                    .unwrap_or_else(|| batch_key(prefix.as_deref(), name));
                let path = file.to_string_lossy();
                let payload = uploader.context().file_read(&path).await?;
                debug!("read {} bytes from {path}", payload.len());

                reqs.push(UploadRequest::new(key, payload, infer_content_type(name)));
            }

            uploader
                .upload_batch(profile, reqs, visibility)
                .await?
                .into_iter()
                .map(Record::from)
                .collect()
        }
        Commands::Fetch { source, key, url } => {
            let visibility = visibility(url)?;
            let uploaded = uploader
                .fetch_and_upload(profile, &source, key.as_deref(), visibility)
                .await?;
            vec![uploaded.into()]
        }
        Commands::Presign { key, expires } => {
            let presigned = presigned_url(profile, &key, expires_from_secs(expires)?)?;
            vec![Record {
                key,
                url: presigned.url,
                expires_at: Some(format_rfc3339(presigned.expires_at)),
            }]
        }
    };

    for record in records {
        if cli.json {
            let line = serde_json::to_string(&record)
                .map_err(|e| Error::unexpected("failed to serialize output").with_source(e))?;
            println!("{line}");
        } else {
            println!("{}", record.url);
        }
    }
    Ok(())
}

fn visibility(args: UrlArgs) -> Result<Visibility> {
    if args.public {
        return Ok(Visibility::Public);
    }
    Ok(Visibility::Temporary(expires_from_secs(args.expires)?))
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|v| v.to_str())
        .ok_or_else(|| {
            Error::request_invalid(format!("{} has no valid file name", path.display()))
        })
}
