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

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// r2up - upload files to S3-compatible storage and print their urls
#[derive(Parser, Debug)]
#[command(name = "r2up")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file, defaults to $R2UP_CONFIG or ~/.r2up.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Bucket profile to use instead of the configured default
    #[arg(short, long, global = true)]
    pub bucket: Option<String>,

    /// Network timeout in seconds for every request
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout: u64,

    /// Print one json record per object instead of the bare url
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// How the printed url can be used.
#[derive(Args, Debug, Clone, Copy)]
pub struct UrlArgs {
    /// Print the permanent public url instead of a presigned one
    #[arg(long)]
    pub public: bool,

    /// Validity of the presigned url in seconds, 1 to 604800
    #[arg(long, default_value_t = 300, allow_negative_numbers = true)]
    pub expires: i64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload local files
    Put {
        /// Files to upload
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Object key, only allowed with a single file
        #[arg(short, long, conflicts_with = "prefix")]
        key: Option<String>,

        /// Key prefix; each file is stored as {prefix}{file name}
        #[arg(short, long)]
        prefix: Option<String>,

        #[command(flatten)]
        url: UrlArgs,
    },

    /// Download a remote resource and upload it
    Fetch {
        /// Source url
        #[arg(value_name = "URL")]
        source: String,

        /// Object key, defaults to {random}/{file name of the url}
        #[arg(short, long)]
        key: Option<String>,

        #[command(flatten)]
        url: UrlArgs,
    },

    /// Print a presigned url for an existing object
    Presign {
        /// Object key
        #[arg(value_name = "KEY")]
        key: String,

        /// Validity of the presigned url in seconds, 1 to 604800
        #[arg(long, default_value_t = 300, allow_negative_numbers = true)]
        expires: i64,
    },
}
