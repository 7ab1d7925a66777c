use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

struct TestApp {
    app: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.db_path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = fs::remove_file(sidecar);
        }
    }
}

async fn spawn_app(tag: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "retro-catalog-api-{tag}-{}-{nanos}.sqlite",
        std::process::id()
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let storage = retro_catalog::CatalogStorage::connect(&database_url)
        .await
        .expect("failed to open database");

    let mut cfg = retro_catalog::Config::default();
    cfg.basic.admin_key = ADMIN_KEY.to_string();
    cfg.basic.body_limit = 64 * 1024;
    let state = retro_catalog::CatalogState::new(
        storage,
        Arc::from(cfg.basic.admin_key.as_str()),
        cfg.catalog,
    );
    let app = retro_catalog::catalog_router(state, &cfg.basic).expect("failed to build router");
    TestApp { app, db_path }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    admin: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if admin {
        builder = builder.header("x-admin-key", ADMIN_KEY);
    }
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let t = spawn_app("health").await;
    let (status, body) = send(&t.app, "GET", "/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn writes_require_admin_key() {
    let t = spawn_app("auth").await;
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/v1/consoles",
        Some(json!({ "name": "Saturn" })),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&t.app, "GET", "/api/v1/consoles", None, false).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn console_crud_flow() {
    let t = spawn_app("console-crud").await;

    let (status, created) = send(
        &t.app,
        "POST",
        "/api/v1/consoles",
        Some(json!({
            "name": "Sega Saturn",
            "manufacturer": "Sega",
            "release_year": 1994,
            "media_formats": "CD-ROM, cartridge"
        })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "sega-saturn");
    assert_eq!(created["media_formats"], json!(["CD-ROM", "cartridge"]));
    let id = created["id"].as_i64().expect("id");

    let (status, fetched) = send(&t.app, "GET", "/api/v1/consoles/sega-saturn", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["manufacturer"], "Sega");

    let (status, dup) = send(
        &t.app,
        "POST",
        "/api/v1/consoles",
        Some(json!({ "name": "SEGA saturn!" })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["error"]["code"], "CONFLICT");

    let (status, patched) = send(
        &t.app,
        "PATCH",
        &format!("/api/v1/consoles/{id}"),
        Some(json!({ "generation": 5, "manufacturer": null })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["generation"], 5);
    assert_eq!(patched["manufacturer"], Value::Null);
    assert_eq!(patched["release_year"], 1994);

    let (status, listed) = send(&t.app, "GET", "/api/v1/consoles?q=SATURN", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&t.app, "DELETE", &format!("/api/v1/consoles/{id}"), None, true).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, missing) = send(&t.app, "GET", "/api/v1/consoles/sega-saturn", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn blank_name_is_invalid_input() {
    let t = spawn_app("blank-name").await;
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/v1/tools",
        Some(json!({ "name": "   " })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn compatibility_add_is_idempotent_over_http() {
    let t = spawn_app("compat").await;
    let (_, handheld) = send(
        &t.app,
        "POST",
        "/api/v1/handhelds",
        Some(json!({ "name": "Miyoo Mini Plus", "connectivity": ["Wi-Fi"] })),
        true,
    )
    .await;
    let (_, cfw) = send(
        &t.app,
        "POST",
        "/api/v1/firmware",
        Some(json!({ "name": "Onion OS", "features": "[\"RetroArch\", \"GameSwitcher\"]" })),
        true,
    )
    .await;
    assert_eq!(cfw["features"], json!(["RetroArch", "GameSwitcher"]));

    let body = json!({
        "left_id": handheld["id"],
        "right_id": cfw["id"],
        "notes": "stable"
    });
    for _ in 0..2 {
        let (status, _) = send(
            &t.app,
            "POST",
            "/api/v1/compat/handheld-firmware",
            Some(body.clone()),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/v1/compat/handheld-firmware/left/{}", handheld["id"]);
    let (status, entries) = send(&t.app, "GET", &uri, None, false).await;
    assert_eq!(status, StatusCode::OK);
    let entries = entries.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["slug"], "onion-os");

    let uri = format!("/api/v1/compat/handheld-firmware/right/{}", cfw["id"]);
    let (_, entries) = send(&t.app, "GET", &uri, None, false).await;
    assert_eq!(entries[0]["slug"], "miyoo-mini-plus");

    let uri = format!(
        "/api/v1/compat/handheld-firmware/{}/{}",
        handheld["id"], cfw["id"]
    );
    let (status, _) = send(&t.app, "DELETE", &uri, None, true).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&t.app, "DELETE", &uri, None, true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &t.app,
        "POST",
        "/api/v1/compat/handheld-firmware",
        Some(json!({ "left_id": 999, "right_id": cfw["id"] })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MISSING_REFERENCE");
}

#[tokio::test]
async fn tool_bundle_and_links() {
    let t = spawn_app("bundle").await;

    let (status, _) = send(
        &t.app,
        "POST",
        "/api/v1/tool-bundles",
        Some(json!({
            "tool": { "name": "RGBDS" },
            "links": [{ "label": "Source", "url": "ftp://example.com" }]
        })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&t.app, "GET", "/api/v1/tools/rgbds", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, bundle) = send(
        &t.app,
        "POST",
        "/api/v1/tool-bundles",
        Some(json!({
            "tool": { "name": "RGBDS", "platforms": "Linux, macOS, Windows" },
            "links": [{
                "label": "Source",
                "url": "https://github.com/gbdev/rgbds",
                "link_type": "source"
            }]
        })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bundle["tool"]["platforms"], json!(["Linux", "macOS", "Windows"]));
    let tool_id = bundle["tool"]["id"].as_i64().expect("tool id");

    let uri = format!("/api/v1/links?owner_kind=tool&owner_id={tool_id}");
    let (status, links) = send(&t.app, "GET", &uri, None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(links[0]["link_type"], "source");
    assert_eq!(links[0]["owner_kind"], "tool");
}

#[tokio::test]
async fn console_scoped_lookups_and_search() {
    let t = spawn_app("console-lookups").await;
    let (_, console) = send(
        &t.app,
        "POST",
        "/api/v1/consoles",
        Some(json!({ "name": "PC Engine" })),
        true,
    )
    .await;
    send(
        &t.app,
        "POST",
        "/api/v1/games",
        Some(json!({ "name": "Bonk's Adventure", "console_id": console["id"] })),
        true,
    )
    .await;
    send(
        &t.app,
        "POST",
        "/api/v1/emulators",
        Some(json!({ "name": "Mednafen", "console_slugs": "PC Engine, Saturn" })),
        true,
    )
    .await;

    let (status, games) =
        send(&t.app, "GET", "/api/v1/consoles/pc-engine/games", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(games[0]["slug"], "bonk-s-adventure");

    let (_, emulators) =
        send(&t.app, "GET", "/api/v1/consoles/pc-engine/emulators", None, false).await;
    assert_eq!(emulators[0]["slug"], "mednafen");

    let (status, _) = send(&t.app, "GET", "/api/v1/consoles/nope/games", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, hits) = send(&t.app, "GET", "/api/v1/search?q=engine", None, false).await;
    let hits = hits.as_array().expect("array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["kind"], "console");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let t = spawn_app("body-limit").await;
    let description = "a".repeat(128 * 1024);
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/v1/games",
        Some(json!({ "name": "Huge", "description": description })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn malformed_input_uses_error_envelope() {
    let t = spawn_app("malformed").await;

    let cases = [
        ("POST", "/api/v1/consoles", Some(json!({ "name": "X", "media_formats": [1, 2] }))),
        ("POST", "/api/v1/consoles", Some(json!(["not", "an", "object"]))),
        ("PATCH", "/api/v1/consoles/abc", Some(json!({ "name": "X" }))),
        ("POST", "/api/v1/compat/not-a-relation", Some(json!({ "left_id": 1, "right_id": 2 }))),
        ("GET", "/api/v1/links?owner_kind=cartridge&owner_id=1", None),
        ("GET", "/api/v1/consoles?limit=lots", None),
    ];
    for (method, uri, body) in cases {
        let (status, resp) = send(&t.app, method, uri, body, true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}: {resp}");
        assert_eq!(resp["error"]["code"], "INVALID_INPUT", "{method} {uri}");
        assert!(resp["error"]["message"].is_string());
    }

    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/consoles")
                .header("content-type", "application/json")
                .header("x-admin-key", ADMIN_KEY)
                .body(Body::from(r#"{"name":"X""#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}
