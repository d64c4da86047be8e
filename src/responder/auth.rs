// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use poem::http::{header, StatusCode};
use poem::Request;

use crate::config::AuthUser;

/// Resolved caller identity. The token table in configuration stands in for
/// the identity provider this service defers to.
pub struct Session {
    pub user: String,
    pub admin: bool,
}

/// Resolves the `Authorization: Bearer` header against the configured user
/// table. Missing, malformed or unknown credentials are a 401; capability
/// checks (admin) are left to the caller.
pub fn authenticate(req: &Request, users: &[AuthUser]) -> poem::Result<Session> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::debug!("missing or malformed authorization header");

            poem::Error::from_status(StatusCode::UNAUTHORIZED)
        })?;

    users
        .iter()
        .find(|user| user.token == token)
        .map(|user| Session {
            user: user.name.clone(),
            admin: user.admin,
        })
        .ok_or_else(|| {
            tracing::debug!("unknown bearer token");

            poem::Error::from_status(StatusCode::UNAUTHORIZED)
        })
}
