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

use crate::SigningMethod;
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(ctx) = self else {
            return false;
        };

        ctx.is_valid()
    }
}

/// SignRequest is the trait used by services to sign a request in place.
///
/// Signing is pure computation: implementations must not perform any I/O, so
/// that a request that cannot be signed always fails before it is sent.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Extra information returned by a successful signing, for example the
    /// intermediate strings used to compute the signature.
    type Output;

    /// Sign the request.
    ///
    /// ## Method
    ///
    /// [`SigningMethod::Header`] writes the signature into request headers, while
    /// [`SigningMethod::Query`] embeds it in the query string so that the
    /// resulting URI can be redeemed later without any extra header.
    fn sign_request(
        &self,
        req: &mut http::request::Parts,
        credential: &Self::Credential,
        method: SigningMethod,
    ) -> crate::Result<Self::Output>;
}
