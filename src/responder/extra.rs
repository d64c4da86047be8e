// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use poem::Request;
use url::Url;

const EXTRA_INFO_TIMEOUT_SECONDS: u64 = 5;

pub type ExtraInfoFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

/// Injected capability queried by the latest endpoint when a client asks for
/// extra info. Implementations may suspend and may fail; a failure degrades
/// the response (the extra info is omitted), it never replaces it.
pub trait ExtraInfoHook: Send + Sync {
    fn fetch<'a>(&'a self, req: &'a Request) -> ExtraInfoFuture<'a>;
}

/// Production hook: fetches a configured upstream URL and returns its body.
pub struct HttpExtraInfo {
    client: reqwest::Client,
    url: Url,
}

impl HttpExtraInfo {
    pub fn new(url: Url) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(EXTRA_INFO_TIMEOUT_SECONDS))
            .build()
            .unwrap();

        HttpExtraInfo { client, url }
    }
}

impl ExtraInfoHook for HttpExtraInfo {
    fn fetch<'a>(&'a self, _req: &'a Request) -> ExtraInfoFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url.clone())
                .send()
                .await?
                .error_for_status()?;

            Ok(response.text().await?.trim().to_string())
        })
    }
}
