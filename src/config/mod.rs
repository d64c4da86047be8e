// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

mod defaults;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub queue: Queue,
    #[serde(default)]
    pub auth: Auth,
}

impl Config {
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("anslag").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Server {
    pub log_level: String,
    pub inet: SocketAddr,

    /// URL prefix all routes are nested under.
    pub path_prefix: String,

    /// Add permissive CORS headers to the JSON endpoints.
    pub allow_origin: bool,

    /// Upstream queried when the latest endpoint is asked for extra info.
    pub extra_info_url: Option<Url>,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            log_level: defaults::server_log_level(),
            inet: defaults::server_inet(),
            path_prefix: defaults::server_path_prefix(),
            allow_origin: defaults::server_allow_origin(),
            extra_info_url: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Assets {
    pub path: PathBuf,
}

impl Default for Assets {
    fn default() -> Self {
        Assets {
            path: defaults::assets_path(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Branding {
    pub page_title: String,

    /// Fixed banner shown above the announcements, eg. a link to a wider
    /// system status page.
    pub fixed_message: String,

    pub logo_path: Option<PathBuf>,
}

impl Default for Branding {
    fn default() -> Self {
        Branding {
            page_title: defaults::branding_page_title(),
            fixed_message: defaults::branding_fixed_message(),
            logo_path: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Queue {
    /// File path where announcements persist as JSON. Empty means the queue
    /// is ephemeral: never read, never written.
    pub persist_path: String,

    /// Days an announcement stays in the queue; fractional values permitted.
    pub lifetime_days: f64,

    /// Seconds between purge runs.
    pub purge_interval: u64,

    /// Record count returned by the list endpoint when no limit is given.
    pub default_limit: i64,
}

impl Queue {
    pub fn persist_path(&self) -> Option<PathBuf> {
        if self.persist_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.persist_path))
        }
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue {
            persist_path: defaults::queue_persist_path(),
            lifetime_days: defaults::queue_lifetime_days(),
            purge_interval: defaults::queue_purge_interval(),
            default_limit: defaults::queue_default_limit(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub users: Vec<AuthUser>,
}

#[derive(Clone, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub token: String,
    #[serde(default)]
    pub admin: bool,
}
