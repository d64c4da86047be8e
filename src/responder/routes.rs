// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use poem::error::InternalServerError;
use poem::http::{header, StatusCode};
use poem::web::{Data, Form, Html, Query, StaticFileRequest};
use poem::{handler, FromRequest, IntoResponse, Request, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tera::Tera;

use super::auth;
use super::context::IndexContext;
use super::extra::ExtraInfoHook;
use crate::config::Config;
use crate::queue::AnnouncementQueue;

#[derive(Deserialize)]
struct LatestQuery {
    extra: Option<String>,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct UpdateForm {
    announcement: String,
}

/// Shared JSON output path for the public endpoints; CORS headers are added
/// when the configuration allows cross-origin access.
fn write_output(output: &Value, allow_origin: bool) -> Response {
    let mut builder = Response::builder().content_type("application/json; charset=utf-8");

    if allow_origin {
        builder = builder
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "OPTIONS,GET");
    }

    builder.body(output.to_string())
}

#[handler]
pub(crate) async fn view(
    req: &Request,
    tera: Data<&Tera>,
    queue: Data<&Arc<AnnouncementQueue>>,
    conf: Data<&Arc<Config>>,
) -> poem::Result<Html<String>> {
    let session = auth::authenticate(req, &conf.auth.users)?;

    // Clones out of the queue lock before the template renders
    let announcements = queue.snapshot();

    let context = IndexContext {
        page_title: &conf.branding.page_title,
        user: &session.user,
        fixed_message: &conf.branding.fixed_message,
        base_url: &conf.server.path_prefix,
        announcements: &announcements,
    };

    let render = tera.render(
        "index.tera",
        &tera::Context::from_serialize(context).map_err(InternalServerError)?,
    );

    match render {
        Ok(s) => Ok(Html(s)),
        Err(e) => Err(InternalServerError(e)),
    }
}

#[handler]
pub(crate) async fn latest(
    req: &Request,
    Query(query): Query<LatestQuery>,
    queue: Data<&Arc<AnnouncementQueue>>,
    conf: Data<&Arc<Config>>,
    hook: Data<&Option<Arc<dyn ExtraInfoHook>>>,
) -> poem::Result<Response> {
    let mut latest = match queue.latest() {
        Some(announcement) => serde_json::to_value(&announcement).map_err(InternalServerError)?,
        None => json!({ "announcement": "" }),
    };

    let query_extra = query
        .extra
        .as_deref()
        .unwrap_or("none")
        .to_ascii_lowercase();

    if let Some(hook) = hook.0 {
        if query_extra == "separate" || query_extra == "combined" {
            match hook.fetch(req).await {
                Ok(extra_info) => merge_extra_info(&mut latest, &query_extra, extra_info),
                Err(err) => {
                    // Degrade to the base announcement
                    tracing::warn!("extra info hook failed ({err})");
                }
            }
        }
    }

    Ok(write_output(&latest, conf.server.allow_origin))
}

fn merge_extra_info(latest_value: &mut Value, query_extra: &str, extra_info: String) {
    let Some(output) = latest_value.as_object_mut() else {
        return;
    };

    if query_extra == "separate" {
        output.insert("extra".to_string(), Value::String(extra_info));
    } else if !extra_info.is_empty() {
        let announcement = output
            .get("announcement")
            .and_then(Value::as_str)
            .unwrap_or("");

        let combined = if announcement.is_empty() {
            extra_info
        } else {
            format!("{announcement}<br>{extra_info}")
        };

        output.insert("announcement".to_string(), Value::String(combined));
    }
}

#[handler]
pub(crate) async fn list(
    Query(query): Query<ListQuery>,
    queue: Data<&Arc<AnnouncementQueue>>,
    conf: Data<&Arc<Config>>,
) -> poem::Result<Response> {
    let limit = query.limit.unwrap_or(conf.queue.default_limit);
    let announcements = queue.list(limit);

    let output = serde_json::to_value(announcements).map_err(InternalServerError)?;

    Ok(write_output(&output, conf.server.allow_origin))
}

#[handler]
pub(crate) async fn update(
    req: &Request,
    Form(form): Form<UpdateForm>,
    queue: Data<&Arc<AnnouncementQueue>>,
    conf: Data<&Arc<Config>>,
) -> poem::Result<Response> {
    let session = auth::authenticate(req, &conf.auth.users)?;

    if !session.admin {
        tracing::debug!("rejecting update from non-admin user {}", session.user);

        return Err(poem::Error::from_status(StatusCode::FORBIDDEN));
    }

    let announcement = ammonia::clean(&form.announcement);

    queue.append(&session.user, &announcement).await;

    Ok(StatusCode::FOUND
        .with_header(header::LOCATION, conf.server.path_prefix.clone())
        .into_response())
}

#[handler]
pub(crate) async fn logo(conf: Data<&Arc<Config>>) -> poem::Result<Response> {
    let Some(logo_path) = &conf.branding.logo_path else {
        return Err(poem::Error::from_status(StatusCode::NOT_FOUND));
    };

    let req = StaticFileRequest::from_request_without_body(&Request::builder().finish()).await?;

    let resp = req
        .create_response(logo_path, false)
        .map_err(|_| poem::Error::from_status(StatusCode::NOT_FOUND))?;

    Ok(resp.into_response())
}
