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

//! Object key generation.

use crate::constants::KEY_TOKEN_LEN;
use crate::content_type::basename;
use rand::Rng;

/// Name used when a path has no last segment, like `https://example.com/`.
const FALLBACK_NAME: &str = "index";

/// Generate a key of the form `{token}/{basename}` where token is
/// [`KEY_TOKEN_LEN`] random lower-case hex characters.
pub fn random_key(name: &str) -> String {
    let mut token = [0u8; KEY_TOKEN_LEN / 2];
    rand::thread_rng().fill(&mut token[..]);

    format!("{}/{}", hex::encode(token), name_or_fallback(name))
}

/// Key used for one item of a batch upload.
///
/// `{prefix}{basename}` when a prefix is given, a [`random_key`] otherwise.
/// The prefix is used verbatim, include the trailing `/` for a directory.
pub fn batch_key(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            format!(
                "{}{}",
                prefix.trim_start_matches('/'),
                name_or_fallback(name)
            )
        }
        _ => random_key(name),
    }
}

fn name_or_fallback(name: &str) -> &str {
    match basename(name) {
        "" => FALLBACK_NAME,
        v => v,
    }
}
