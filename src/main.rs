// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

#![deny(rust_2018_idioms)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Arg, Command};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use anslag::config::Config;
use anslag::queue::AnnouncementQueue;
use anslag::{purger, responder};

struct AppArgs {
    config: String,
}

fn make_app_args() -> AppArgs {
    let matches = Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file")
                .default_value("./anslag.toml"),
        )
        .get_matches();

    // Generate owned app arguments
    AppArgs {
        config: matches
            .get_one::<String>("config")
            .expect("invalid config value")
            .to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = make_app_args();

    let conf = Config::new(Path::new(&args.config))
        .with_context(|| format!("cannot load configuration from {}", args.config))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&conf.server.log_level)),
        )
        .init();

    tracing::info!("starting up");

    let conf = Arc::new(conf);
    let queue = Arc::new(AnnouncementQueue::new(
        conf.queue.persist_path(),
        conf.queue.lifetime_days,
    ));

    // Spawn purger (background task)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let purger = tokio::spawn(purger::manager::run(
        queue.clone(),
        Duration::from_secs(conf.queue.purge_interval),
        shutdown_rx,
    ));

    // Run Web responder (foreground task)
    responder::manager::run(conf, queue).await?;

    tracing::info!("shutting down server");

    let _ = shutdown_tx.send(true);
    let _ = purger.await;

    Ok(())
}
