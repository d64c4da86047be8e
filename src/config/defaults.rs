// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::net::SocketAddr;
use std::path::PathBuf;

pub fn server_log_level() -> String {
    "info".to_string()
}

pub fn server_inet() -> SocketAddr {
    "[::]:8080".parse().unwrap()
}

pub fn server_path_prefix() -> String {
    "/announcement".to_string()
}

pub fn server_allow_origin() -> bool {
    false
}

pub fn assets_path() -> PathBuf {
    PathBuf::from("./res/assets")
}

pub fn branding_page_title() -> String {
    "Announcements".to_string()
}

pub fn branding_fixed_message() -> String {
    String::new()
}

pub fn queue_persist_path() -> String {
    String::new()
}

pub fn queue_lifetime_days() -> f64 {
    7.0
}

pub fn queue_purge_interval() -> u64 {
    300
}

pub fn queue_default_limit() -> i64 {
    5
}
