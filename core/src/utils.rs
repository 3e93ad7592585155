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

//! Utility functions and types.

use std::fmt::{Debug, Formatter};

/// Hides credential material in `Debug` output.
///
/// Access key ids keep a short prefix so profiles can be told apart in logs.
/// Secrets never show any of their characters.
#[derive(Clone, Copy)]
pub enum Redacted<'a> {
    /// An access key id.
    KeyId(&'a str),
    /// A secret access key.
    Secret(&'a str),
}

/// Characters of an access key id kept visible.
const KEY_ID_PREFIX: usize = 4;

impl Debug for Redacted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (value, visible) = match *self {
            Redacted::KeyId(v) => (v, KEY_ID_PREFIX),
            Redacted::Secret(v) => (v, 0),
        };
        if value.is_empty() {
            return f.write_str("<empty>");
        }

        // Short ids are hidden entirely.
        let prefix = match value.char_indices().nth(visible) {
            Some((idx, _)) if value.len() >= 3 * visible => &value[..idx],
            _ => "",
        };
        write!(f, "{prefix}***")
    }
}
