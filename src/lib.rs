// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

#![deny(rust_2018_idioms)]

pub mod config;
pub mod purger;
pub mod queue;
pub mod responder;
