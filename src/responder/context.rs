// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;

use crate::queue::Announcement;

#[derive(Serialize)]
pub struct IndexContext<'a> {
    pub page_title: &'a str,
    pub user: &'a str,
    pub fixed_message: &'a str,
    pub base_url: &'a str,
    pub announcements: &'a [Announcement],
}
