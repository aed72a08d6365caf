//! End-to-end runs of the `zlet` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use tempfile::tempdir;
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer tok-1")
}

fn zlet(session: &Path) -> Command {
    let mut cmd = Command::cargo_bin("zlet").unwrap();
    cmd.env("ZLET_SESSION_PATH", session)
        .env_remove("ZLET_API_URL")
        .env_remove("ZLET_CANCEL_DEADLINE")
        .env("RUST_LOG", "error");
    cmd
}

fn camp_router() -> Router {
    Router::new()
        .route(
            "/users/me",
            get(|headers: HeaderMap| async move {
                if authorized(&headers) {
                    (
                        StatusCode::OK,
                        Json(json!({"email": "clan@taborniki.si", "leader": false, "name": "Ana", "surname": "Novak"})),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"})))
                }
            }),
        )
        .route(
            "/afternoon_applications",
            get(|| async { Json(json!([])) }),
        )
        .route(
            "/afternoon_application",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found"}))) }),
        )
        .route(
            "/afternoon_activities",
            get(|| async {
                Json(json!([
                    {"id": 4, "name": "Lokostrelstvo", "description": "", "free_spots": 3, "location": "Travnik"},
                    {"id": 5, "name": "Kajak", "description": "", "free_spots": 0}
                ]))
            }),
        )
        .route(
            "/apply_afternoon",
            post(|| async { Json(json!({"answers": "4"})) }),
        )
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("zlet")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("afternoon"))
        .stdout(predicate::str::contains("roster"));
}

#[test]
fn completion_script_is_generated() {
    Command::cargo_bin("zlet")
        .unwrap()
        .args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zlet"));
}

#[test]
fn config_file_is_generated() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("zlet.yaml");
    Command::cargo_bin("zlet")
        .unwrap()
        .args(["config", "--format", "yaml", "--output"])
        .arg(&target)
        .assert()
        .success();
    let content = fs::read_to_string(target).unwrap();
    assert!(content.contains("Izlet na morje"));
}

#[test]
fn me_without_session_fails() {
    let dir = tempdir().unwrap();
    zlet(&dir.path().join("missing.token"))
        .arg("me")
        .assert()
        .failure()
        .stderr(predicate::str::contains("zlet login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn afternoon_list_and_apply() {
    let base = spawn(camp_router()).await;
    let dir = tempdir().unwrap();
    let session = dir.path().join("session.token");
    fs::write(&session, "tok-1").unwrap();

    let list = {
        let (base, session) = (base.clone(), session.clone());
        tokio::task::spawn_blocking(move || {
            zlet(&session)
                .args(["--server", &base, "afternoon", "list", "--day", "Pon"])
                .assert()
                .success()
                .get_output()
                .stdout
                .clone()
        })
        .await
        .unwrap()
    };
    let list = String::from_utf8(list).unwrap();
    assert!(list.contains("Lokostrelstvo"));
    assert!(!list.contains("Kajak"));

    tokio::task::spawn_blocking(move || {
        zlet(&session)
            .args(["--server", &base, "afternoon", "apply", "4", "--day", "Pon"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Applied (Pon): Lokostrelstvo"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_is_removed() {
    let base = spawn(camp_router()).await;
    let dir = tempdir().unwrap();
    let session = dir.path().join("session.token");
    fs::write(&session, "stale").unwrap();

    let path = session.clone();
    tokio::task::spawn_blocking(move || {
        zlet(&path)
            .args(["--server", &base, "me"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("session expired"));
    })
    .await
    .unwrap();

    assert!(!session.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn roster_for_a_day_does_not_touch_the_default_day() {
    let router = Router::new()
        .route("/afternoon_applications", get(|| async { Json(json!([])) }))
        .route(
            "/group_applications",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                match query.get("day").map(String::as_str) {
                    Some("Pon") => (
                        StatusCode::OK,
                        Json(json!([{
                            "user_id": "00000000-0000-0000-0000-000000000001",
                            "first_name": "Ana", "surname": "Novak",
                            "name": "Kajak", "equipment": "Kopalke", "location": "Soča"
                        }])),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json::<Value>(json!({"detail": "boom"})),
                    ),
                }
            }),
        );
    let base = spawn(router).await;
    let dir = tempdir().unwrap();
    let session = dir.path().join("session.token");
    fs::write(&session, "tok-1").unwrap();

    tokio::task::spawn_blocking(move || {
        zlet(&session)
            .args(["--server", &base, "roster", "--day", "Pon"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Ana Novak"))
            .stdout(predicate::str::contains("Kajak"));
    })
    .await
    .unwrap();
}
