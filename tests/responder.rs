// SPDX-License-Identifier: MPL-2.0
//
// Anslag
//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this file,
//   You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use poem::http::StatusCode;
use poem::test::TestClient;
use poem::Request;
use serde_json::json;

use anslag::config::{Assets, Auth, AuthUser, Branding, Config, Queue, Server};
use anslag::queue::AnnouncementQueue;
use anslag::responder::extra::{ExtraInfoFuture, ExtraInfoHook};
use anslag::responder::manager::build_app;

const ADMIN_TOKEN: &str = "admin-token";
const VIEWER_TOKEN: &str = "viewer-token";

struct StaticExtraInfo(&'static str);

impl ExtraInfoHook for StaticExtraInfo {
    fn fetch<'a>(&'a self, _req: &'a Request) -> ExtraInfoFuture<'a> {
        let info = self.0.to_string();

        Box::pin(async move { Ok(info) })
    }
}

struct FailingExtraInfo;

impl ExtraInfoHook for FailingExtraInfo {
    fn fetch<'a>(&'a self, _req: &'a Request) -> ExtraInfoFuture<'a> {
        Box::pin(async { Err(anyhow::anyhow!("upstream down")) })
    }
}

fn make_conf(allow_origin: bool) -> Arc<Config> {
    Arc::new(Config {
        server: Server {
            allow_origin,
            ..Server::default()
        },
        assets: Assets {
            path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/res/assets")),
        },
        branding: Branding {
            fixed_message: "Maintenance window on Friday".to_string(),
            ..Branding::default()
        },
        queue: Queue::default(),
        auth: Auth {
            users: vec![
                AuthUser {
                    name: "admin".to_string(),
                    token: ADMIN_TOKEN.to_string(),
                    admin: true,
                },
                AuthUser {
                    name: "viewer".to_string(),
                    token: VIEWER_TOKEN.to_string(),
                    admin: false,
                },
            ],
        },
    })
}

fn make_client(
    conf: Arc<Config>,
    queue: Arc<AnnouncementQueue>,
    extra_info: Option<Arc<dyn ExtraInfoHook>>,
) -> TestClient<impl poem::Endpoint> {
    TestClient::new(build_app(conf, queue, extra_info).unwrap())
}

#[tokio::test]
async fn latest_returns_placeholder_when_empty() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue, None);

    let resp = cli.get("/announcement/latest").send().await;

    resp.assert_status_is_ok();
    resp.assert_json(json!({ "announcement": "" })).await;
}

#[tokio::test]
async fn update_appends_sanitized_and_redirects() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue.clone(), None);

    let resp = cli
        .post("/announcement/update")
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .content_type("application/x-www-form-urlencoded")
        .body("announcement=<script>alert(1)</script>hello <b>world</b>")
        .send()
        .await;

    resp.assert_status(StatusCode::FOUND);
    assert_eq!(queue.len(), 1);

    let latest = queue.latest().unwrap();

    assert_eq!(latest.user, "admin");
    assert!(!latest.announcement.contains("alert"));
    assert!(latest.announcement.contains("hello <b>world</b>"));

    let resp = cli.get("/announcement/latest").send().await;

    resp.assert_status_is_ok();

    let body = resp.json().await;
    let output = body.value();

    assert_eq!(
        output.object().get("announcement").string(),
        "hello <b>world</b>"
    );
    assert_eq!(output.object().get("user").string(), "admin");
}

#[tokio::test]
async fn update_without_token_is_unauthorized() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue.clone(), None);

    let resp = cli
        .post("/announcement/update")
        .content_type("application/x-www-form-urlencoded")
        .body("announcement=hi")
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn update_from_non_admin_is_forbidden() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue.clone(), None);

    let resp = cli
        .post("/announcement/update")
        .header("authorization", format!("Bearer {VIEWER_TOKEN}"))
        .content_type("application/x-www-form-urlencoded")
        .body("announcement=hi")
        .send()
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn update_with_missing_field_is_bad_request() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue.clone(), None);

    let resp = cli
        .post("/announcement/update")
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .content_type("application/x-www-form-urlencoded")
        .body("something=else")
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn list_respects_limit_and_order() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));

    for index in 0..10 {
        queue.append("admin", &format!("note {index}")).await;
    }

    let cli = make_client(make_conf(false), queue, None);

    let resp = cli.get("/announcement/list?limit=3").send().await;

    resp.assert_status_is_ok();

    let body = resp.json().await;
    let output = body.value();

    assert_eq!(output.array().len(), 3);
    assert_eq!(
        output.array().get(0).object().get("announcement").string(),
        "note 7"
    );
    assert_eq!(
        output.array().get(2).object().get("announcement").string(),
        "note 9"
    );
}

#[tokio::test]
async fn list_with_zero_limit_is_empty() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));

    queue.append("admin", "note").await;

    let cli = make_client(make_conf(false), queue, None);

    let resp = cli.get("/announcement/list?limit=0").send().await;

    resp.assert_status_is_ok();
    resp.assert_json(json!([])).await;
}

#[tokio::test]
async fn list_defaults_to_configured_limit() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));

    for index in 0..10 {
        queue.append("admin", &format!("note {index}")).await;
    }

    let cli = make_client(make_conf(false), queue, None);

    let resp = cli.get("/announcement/list").send().await;

    resp.assert_status_is_ok();

    let body = resp.json().await;

    // Queue::default keeps default_limit at 5
    assert_eq!(body.value().array().len(), 5);
}

#[tokio::test]
async fn json_endpoints_carry_cors_headers_when_allowed() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(true), queue, None);

    let resp = cli.get("/announcement/latest").send().await;

    resp.assert_status_is_ok();
    resp.assert_header("access-control-allow-origin", "*");
    resp.assert_header("access-control-allow-headers", "Content-Type");
    resp.assert_header("access-control-allow-methods", "OPTIONS,GET");

    let resp = cli.get("/announcement/list").send().await;

    resp.assert_status_is_ok();
    resp.assert_header("access-control-allow-origin", "*");
}

#[tokio::test]
async fn latest_extra_separate_adds_field() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(
        make_conf(false),
        queue,
        Some(Arc::new(StaticExtraInfo("all systems go"))),
    );

    let resp = cli.get("/announcement/latest?extra=separate").send().await;

    resp.assert_status_is_ok();
    resp.assert_json(json!({ "announcement": "", "extra": "all systems go" }))
        .await;
}

#[tokio::test]
async fn latest_extra_combined_merges_text() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));

    queue.append("admin", "hello").await;

    let cli = make_client(
        make_conf(false),
        queue,
        Some(Arc::new(StaticExtraInfo("all systems go"))),
    );

    let resp = cli.get("/announcement/latest?extra=combined").send().await;

    resp.assert_status_is_ok();

    let body = resp.json().await;

    assert_eq!(
        body.value().object().get("announcement").string(),
        "hello<br>all systems go"
    );
}

#[tokio::test]
async fn latest_extra_combined_substitutes_when_empty() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(
        make_conf(false),
        queue,
        Some(Arc::new(StaticExtraInfo("all systems go"))),
    );

    let resp = cli.get("/announcement/latest?extra=combined").send().await;

    resp.assert_status_is_ok();
    resp.assert_json(json!({ "announcement": "all systems go" }))
        .await;
}

#[tokio::test]
async fn latest_survives_failing_extra_hook() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue, Some(Arc::new(FailingExtraInfo)));

    let resp = cli.get("/announcement/latest?extra=separate").send().await;

    resp.assert_status_is_ok();
    resp.assert_json(json!({ "announcement": "" })).await;
}

#[tokio::test]
async fn view_requires_session() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));
    let cli = make_client(make_conf(false), queue, None);

    let resp = cli.get("/announcement").send().await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn view_renders_for_authenticated_user() {
    let queue = Arc::new(AnnouncementQueue::new(None, 7.0));

    queue.append("admin", "hello world").await;

    let cli = make_client(make_conf(false), queue, None);

    let resp = cli
        .get("/announcement")
        .header("authorization", format!("Bearer {VIEWER_TOKEN}"))
        .send()
        .await;

    resp.assert_status_is_ok();
    resp.assert_content_type("text/html; charset=utf-8");
}
