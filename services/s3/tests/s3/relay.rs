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

use super::{profile, uploader};
use http::StatusCode;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use r2up_core::{ErrorKind, Result};
use r2up_s3::{BucketProfile, Visibility};
use std::time::Duration;

#[tokio::test]
async fn test_fetch_and_upload() -> Result<()> {
    let mut source = mockito::Server::new_async().await;
    let get = source
        .mock("GET", "/photos/cat.png")
        .match_header("user-agent", "Mozilla/5.0")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body("meow")
        .create_async()
        .await;

    let mut store = mockito::Server::new_async().await;
    let put = store
        .mock("PUT", Matcher::Regex(r"^/b/[0-9a-f]{8}/cat\.png$".into()))
        .match_header("content-type", "image/png")
        .match_body("meow")
        .with_status(200)
        .create_async()
        .await;

    let uploaded = uploader()
        .fetch_and_upload(
            &profile(&store),
            &format!("{}/photos/cat.png", source.url()),
            None,
            Visibility::Public,
        )
        .await?;

    get.assert_async().await;
    put.assert_async().await;
    let (token, name) = uploaded.key.split_once('/').expect("key must have a token");
    assert_eq!(token.len(), 8);
    assert_eq!(name, "cat.png");
    assert_eq!(uploaded.url, format!("{}/b/{}", store.url(), uploaded.key));
    Ok(())
}

#[tokio::test]
async fn test_fetch_and_upload_with_key_infers_content_type() -> Result<()> {
    let mut source = mockito::Server::new_async().await;
    let _get = source
        .mock("GET", "/feed")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut store = mockito::Server::new_async().await;
    let put = store
        .mock("PUT", "/b/data/feed.json")
        .match_header("content-type", "application/json")
        .with_status(200)
        .create_async()
        .await;

    let uploaded = uploader()
        .fetch_and_upload(
            &profile(&store),
            &format!("{}/feed", source.url()),
            Some("data/feed.json"),
            Visibility::Public,
        )
        .await?;

    put.assert_async().await;
    assert_eq!(uploaded.key, "data/feed.json");
    Ok(())
}

#[tokio::test]
async fn test_missing_source_uploads_nothing() -> Result<()> {
    let mut source = mockito::Server::new_async().await;
    let get = source
        .mock("GET", "/photos/missing.png")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let mut store = mockito::Server::new_async().await;
    let put = store
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = uploader()
        .fetch_and_upload(
            &profile(&store),
            &format!("{}/photos/missing.png", source.url()),
            None,
            Visibility::Public,
        )
        .await
        .expect_err("404 source must fail");

    get.assert_async().await;
    put.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.message().starts_with("failed to fetch"));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_source_uploads_nothing() -> Result<()> {
    let mut store = mockito::Server::new_async().await;
    let put = store
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    // Port 9 (discard) is closed on test machines.
    let err = uploader()
        .fetch_and_upload(
            &profile(&store),
            "http://127.0.0.1:9/a.png",
            None,
            Visibility::Public,
        )
        .await
        .expect_err("unreachable source must fail");

    put.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Transport);
    Ok(())
}

#[tokio::test]
async fn test_bad_configuration_fetches_nothing() -> Result<()> {
    let mut source = mockito::Server::new_async().await;
    let get = source
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let mut store = mockito::Server::new_async().await;
    let put = store
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let cases = [
        (profile(&store), None, Visibility::Temporary(Duration::ZERO), ErrorKind::ConfigInvalid),
        (
            profile(&store),
            None,
            Visibility::Temporary(Duration::from_secs(604801)),
            ErrorKind::ConfigInvalid,
        ),
        (
            BucketProfile::new("", "ak", "sk", "b"),
            None,
            Visibility::Public,
            ErrorKind::ConfigInvalid,
        ),
        (
            BucketProfile::new(store.url(), "ak", "sk", ""),
            None,
            Visibility::Public,
            ErrorKind::ConfigInvalid,
        ),
        (
            BucketProfile::new(store.url(), "", "", "b"),
            None,
            Visibility::Public,
            ErrorKind::ConfigInvalid,
        ),
        (profile(&store), Some("/"), Visibility::Public, ErrorKind::RequestInvalid),
    ];
    for (profile, key, visibility, kind) in cases {
        let err = uploader()
            .fetch_and_upload(
                &profile,
                &format!("{}/photos/cat.png", source.url()),
                key,
                visibility,
            )
            .await
            .expect_err("bad configuration must fail");
        assert_eq!(err.kind(), kind, "{profile:?} {key:?} {visibility:?}");
    }

    get.assert_async().await;
    put.assert_async().await;
    Ok(())
}
