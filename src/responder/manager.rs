// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use poem::endpoint::StaticFilesEndpoint;
use poem::listener::TcpListener;
use poem::middleware::{NormalizePath, TrailingSlash};
use poem::{get, post, Endpoint, EndpointExt, Route, Server};
use tera::Tera;

use super::extra::{ExtraInfoHook, HttpExtraInfo};
use super::routes;
use crate::config::Config;
use crate::queue::AnnouncementQueue;

const SHUTDOWN_GRACE_SECONDS: u64 = 5;

pub fn build_app(
    conf: Arc<Config>,
    queue: Arc<AnnouncementQueue>,
    extra_info: Option<Arc<dyn ExtraInfoHook>>,
) -> anyhow::Result<impl Endpoint> {
    let templates: String = conf
        .assets
        .path
        .canonicalize()
        .context("assets directory not found")?
        .join("templates")
        .join("*")
        .to_str()
        .context("assets path is not valid unicode")?
        .into();

    let tera = Tera::new(&templates)?;

    let inner = Route::new()
        .at("/", get(routes::view))
        .at("/latest", get(routes::latest))
        .at("/list", get(routes::list))
        .at("/update", post(routes::update))
        .at("/logo", get(routes::logo))
        .nest(
            "/static",
            StaticFilesEndpoint::new(conf.assets.path.join("static")),
        );

    let app = Route::new()
        .nest(&conf.server.path_prefix, inner)
        .data(tera)
        .data(queue)
        .data(extra_info)
        .data(conf)
        .with(NormalizePath::new(TrailingSlash::Trim));

    Ok(app)
}

pub async fn run(conf: Arc<Config>, queue: Arc<AnnouncementQueue>) -> anyhow::Result<()> {
    let extra_info = conf
        .server
        .extra_info_url
        .clone()
        .map(|url| Arc::new(HttpExtraInfo::new(url)) as Arc<dyn ExtraInfoHook>);

    let app = build_app(conf.clone(), queue, extra_info)?;

    Server::new(TcpListener::bind(conf.server.inet))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
            Some(Duration::from_secs(SHUTDOWN_GRACE_SECONDS)),
        )
        .await?;

    Ok(())
}
