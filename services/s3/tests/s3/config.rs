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

use pretty_assertions::assert_eq;
use r2up_core::{Context, ErrorKind, Result, StaticEnv};
use r2up_file_read_tokio::TokioFileRead;
use r2up_s3::Config;
use std::collections::HashMap;
use std::io::Write;

const CONFIG: &str = r#"
default = "blog"

[buckets.blog]
endpoint = "https://x.r2.cloudflarestorage.com"
access_key_id = "ak"
secret_access_key = "sk"
bucket_name = "blog-images"
"#;

fn ctx(env: StaticEnv) -> Context {
    Context::new().with_file_read(TokioFileRead).with_env(env)
}

#[tokio::test]
async fn test_load_explicit_path() -> Result<()> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(CONFIG.as_bytes())?;
    let path = f.path().to_string_lossy().to_string();

    let cfg = Config::load(&ctx(StaticEnv::default()), Some(&path)).await?;
    assert_eq!(cfg.profile(None)?.bucket_name()?, "blog-images");
    Ok(())
}

#[tokio::test]
async fn test_load_from_env() -> Result<()> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(CONFIG.as_bytes())?;

    let env = StaticEnv {
        home_dir: None,
        envs: HashMap::from([(
            "R2UP_CONFIG".to_string(),
            f.path().to_string_lossy().to_string(),
        )]),
    };
    let cfg = Config::load(&ctx(env), None).await?;
    assert_eq!(cfg.default.as_deref(), Some("blog"));
    Ok(())
}

#[tokio::test]
async fn test_load_from_home_dir() -> Result<()> {
    let home = tempfile::tempdir()?;
    std::fs::write(home.path().join(".r2up.toml"), CONFIG)?;

    let env = StaticEnv {
        home_dir: Some(home.path().to_path_buf()),
        envs: HashMap::new(),
    };
    let cfg = Config::load(&ctx(env), None).await?;
    assert_eq!(
        cfg.profile(Some("blog"))?.endpoint()?,
        "https://x.r2.cloudflarestorage.com"
    );
    Ok(())
}

#[tokio::test]
async fn test_load_missing_file() -> Result<()> {
    let home = tempfile::tempdir()?;
    let env = StaticEnv {
        home_dir: Some(home.path().to_path_buf()),
        envs: HashMap::new(),
    };

    let err = Config::load(&ctx(env), None)
        .await
        .expect_err("missing file must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    Ok(())
}

#[tokio::test]
async fn test_load_invalid_file() -> Result<()> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(b"[buckets.blog\n")?;
    let path = f.path().to_string_lossy().to_string();

    let err = Config::load(&ctx(StaticEnv::default()), Some(&path))
        .await
        .expect_err("invalid toml must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.message().contains(&path));
    Ok(())
}
