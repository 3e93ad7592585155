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
use r2up_s3::{UploadRequest, Visibility};
use std::time::Duration;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

#[tokio::test]
async fn test_upload_public() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/img/a.jpg")
        .match_header("content-type", "image/jpeg")
        .match_header("content-length", "5")
        .match_header("x-amz-content-sha256", HELLO_SHA256)
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".into()))
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=ak/\d{8}/auto/s3/aws4_request, SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date, Signature=[0-9a-f]{64}$".into(),
            ),
        )
        .match_body("hello")
        .with_status(200)
        .create_async()
        .await;

    let req = UploadRequest::new("img/a.jpg", "hello", "image/jpeg");
    let uploaded = uploader()
        .upload(&profile(&server), &req, Visibility::Public)
        .await?;

    mock.assert_async().await;
    assert_eq!(uploaded.key, "img/a.jpg");
    assert_eq!(uploaded.url, format!("{}/b/img/a.jpg", server.url()));
    assert_eq!(uploaded.expires_at, None);
    Ok(())
}

#[tokio::test]
async fn test_upload_public_url() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/img/a.jpg")
        .with_status(200)
        .create_async()
        .await;

    let profile = profile(&server).with_public_url("https://cdn.example.com");
    let req = UploadRequest::new("img/a.jpg", "hello", "image/jpeg");
    let uploaded = uploader().upload(&profile, &req, Visibility::Public).await?;

    mock.assert_async().await;
    assert_eq!(uploaded.url, "https://cdn.example.com/img/a.jpg");
    Ok(())
}

#[tokio::test]
async fn test_upload_sends_unsigned_metadata_headers() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/a.pdf")
        .match_header("cache-control", "public, max-age=31536000")
        .match_header("content-disposition", "attachment; filename=\"a.pdf\"")
        .match_header(
            "authorization",
            Matcher::Regex("SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date,".into()),
        )
        .with_status(200)
        .create_async()
        .await;

    let req = UploadRequest::new("a.pdf", "%PDF", "application/pdf")
        .with_cache_control("public, max-age=31536000")
        .with_content_disposition("attachment; filename=\"a.pdf\"");
    uploader()
        .upload(&profile(&server), &req, Visibility::Public)
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_upload_temporary() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/report.txt")
        .with_status(200)
        .create_async()
        .await;

    let profile = profile(&server).with_public_url("https://cdn.example.com");
    let req = UploadRequest::new("report.txt", "hello", "text/plain");
    let uploaded = uploader()
        .upload(&profile, &req, Visibility::Temporary(Duration::from_secs(300)))
        .await?;

    mock.assert_async().await;
    // Temporary urls are always built on the endpoint.
    assert!(uploaded
        .url
        .starts_with(&format!("{}/b/report.txt?X-Amz-Algorithm=AWS4-HMAC-SHA256", server.url())));
    assert!(uploaded.url.contains("&X-Amz-Expires=300&"));
    assert!(uploaded.url.contains("&X-Amz-Signature="));
    assert!(uploaded.expires_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_upload_twice_returns_same_url() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/a.png")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let uploader = uploader();
    let profile = profile(&server);
    let req = UploadRequest::new("a.png", "png", "image/png");
    let first = uploader.upload(&profile, &req, Visibility::Public).await?;
    let second = uploader.upload(&profile, &req, Visibility::Public).await?;

    mock.assert_async().await;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_upload_forbidden_is_provider_error() -> Result<()> {
    let body = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>SignatureDoesNotMatch</Code><Message>The request signature we calculated does not match the signature you provided.</Message></Error>";

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/b/a.png")
        .with_status(403)
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let req = UploadRequest::new("a.png", "png", "image/png");
    let err = uploader()
        .upload(&profile(&server), &req, Visibility::Public)
        .await
        .expect_err("403 must fail");

    // Exactly one attempt.
    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.body(), Some(body));
    assert!(err.message().contains("403"));
    assert!(err.message().contains("SignatureDoesNotMatch"));
    Ok(())
}

#[tokio::test]
async fn test_upload_created_is_not_success() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/b/a.png")
        .with_status(201)
        .create_async()
        .await;

    let req = UploadRequest::new("a.png", "png", "image/png");
    let err = uploader()
        .upload(&profile(&server), &req, Visibility::Public)
        .await
        .expect_err("only 200 is a success");
    assert_eq!(err.status(), Some(StatusCode::CREATED));
    Ok(())
}

#[tokio::test]
async fn test_invalid_expiry_sends_nothing() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let uploader = uploader();
    let req = UploadRequest::new("a.png", "png", "image/png");
    for expires in [Duration::ZERO, Duration::from_secs(604801)] {
        let err = uploader
            .upload(&profile(&server), &req, Visibility::Temporary(expires))
            .await
            .expect_err("expiry must be rejected");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_sends_nothing() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut profile = profile(&server);
    profile.secret_access_key = String::new();
    let req = UploadRequest::new("a.png", "png", "image/png");
    let err = uploader()
        .upload(&profile, &req, Visibility::Public)
        .await
        .expect_err("credential must be rejected");

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_transport_error() -> Result<()> {
    // Connections are queued by the kernel but never answered.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let endpoint = format!("http://{}", listener.local_addr()?);

    let profile = r2up_s3::BucketProfile::new(endpoint, "ak", "sk", "b");
    let req = UploadRequest::new("a.png", "png", "image/png");
    let err = uploader()
        .with_timeout(Duration::from_millis(200))
        .upload(&profile, &req, Visibility::Public)
        .await
        .expect_err("must time out");

    assert_eq!(err.kind(), ErrorKind::Transport);
    drop(listener);
    Ok(())
}

#[tokio::test]
async fn test_upload_batch_stops_at_first_failure() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("PUT", "/b/posts/a.png")
        .with_status(200)
        .create_async()
        .await;
    let second = server
        .mock("PUT", "/b/posts/b.png")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let third = server
        .mock("PUT", "/b/posts/c.png")
        .expect(0)
        .create_async()
        .await;

    let reqs = ["a.png", "b.png", "c.png"]
        .into_iter()
        .map(|name| UploadRequest::new(format!("posts/{name}"), "png", "image/png"));
    let err = uploader()
        .upload_batch(&profile(&server), reqs, Visibility::Public)
        .await
        .expect_err("second upload must fail");

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.body(), Some("internal error"));
    Ok(())
}

#[tokio::test]
async fn test_upload_batch() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", Matcher::Regex(r"^/b/posts/[ab]\.png$".into()))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let reqs = vec![
        UploadRequest::new("posts/a.png", "a", "image/png"),
        UploadRequest::new("posts/b.png", "b", "image/png"),
    ];
    let uploaded = uploader()
        .upload_batch(&profile(&server), reqs, Visibility::Public)
        .await?;

    mock.assert_async().await;
    assert_eq!(
        uploaded.iter().map(|v| v.key.as_str()).collect::<Vec<_>>(),
        vec!["posts/a.png", "posts/b.png"]
    );
    Ok(())
}
