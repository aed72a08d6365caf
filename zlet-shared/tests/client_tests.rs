//! Gateway client against an in-process mock of the registration server.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Form, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use shared::client::{ApiError, CampClient, RegistrationApi};
use shared::models::{LoginForm, LoginRejection, OfferingId};
use shared::program::{CancellationPolicy, Category, PROGRAM_DAYS};
use shared::selection::{Phase, SelectionMachine, flow};
use shared::session::{Access, Session};

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct ApplyForm {
    answers: String,
    day: Option<String>,
}

#[derive(Deserialize)]
struct DayQuery {
    day: Option<String>,
}

#[tokio::test]
async fn login_stores_token_and_attaches_it() {
    let router = Router::new()
        .route(
            "/auth/jwt/login",
            post(|Form(creds): Form<Credentials>| async move {
                if creds.username == "vodnik@taborniki.si" && creds.password == "12345" {
                    (
                        StatusCode::OK,
                        Json(json!({"access_token": "tok-1", "token_type": "bearer"})),
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"detail": "LOGIN_BAD_CREDENTIALS"})),
                    )
                }
            }),
        )
        .route(
            "/users/me",
            get(|headers: HeaderMap| async move {
                match bearer(&headers).as_deref() {
                    Some("tok-1") => (
                        StatusCode::OK,
                        Json(json!({"email": "vodnik@taborniki.si", "leader": true})),
                    ),
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"}))),
                }
            }),
        );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    let token = client
        .login(&LoginForm {
            username: "vodnik@taborniki.si".into(),
            password: "12345".into(),
        })
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok-1");
    assert_eq!(client.session().guard(), Access::Granted);

    let profile = client.me().await.unwrap();
    assert!(profile.leader);
}

#[tokio::test]
async fn closed_registration_window_is_classified() {
    let router = Router::new().route(
        "/auth/jwt/login",
        post(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({"detail": "Login not yet open for early applicants."})),
            )
        }),
    );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    let err = client
        .login(&LoginForm {
            username: "a@b.si".into(),
            password: "1".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(LoginRejection::classify(&err), LoginRejection::EarlyWindowClosed);
    assert!(!client.session().is_active());
}

#[tokio::test]
async fn unauthorized_response_expires_session_and_runs_hook() {
    let router = Router::new().route(
        "/trails",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"}))) }),
    );
    let base = spawn(router).await;
    let redirects = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&redirects);
    let session = Session::in_memory().with_expiry_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    session.begin("expired-token").unwrap();
    let client = CampClient::new(&base, session);

    let err = client.offerings(Category::Trail, None).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(client.session().token().is_none());
    assert_eq!(client.session().guard(), Access::RedirectToEntry);
    assert_eq!(redirects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_application_maps_to_none() {
    let router = Router::new()
        .route(
            "/application",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "No application found"}))) }),
        )
        .route(
            "/morning_application",
            get(|| async { Json(json!({"answers": null})) }),
        );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    assert_eq!(client.existing_application(Category::Trail, None).await, Ok(None));
    assert_eq!(
        client
            .existing_application(Category::Morning, Some("Pon"))
            .await,
        Ok(None)
    );
}

#[tokio::test]
async fn day_scoped_requests_carry_day_and_form_body() {
    let router = Router::new()
        .route(
            "/afternoon_activities",
            get(|Query(query): Query<DayQuery>| async move {
                let day = query.day.unwrap_or_default();
                Json(json!([
                    {"id": 1, "name": format!("Kajak {day}"), "description": "", "free_spots": 2},
                    {"id": 2, "name": "Plezanje", "description": "", "free_spots": 0}
                ]))
            }),
        )
        .route(
            "/apply_afternoon",
            post(|Form(body): Form<ApplyForm>| async move {
                if body.answers == "1" && body.day.as_deref() == Some("Čet") {
                    (StatusCode::OK, Json(json!({"answers": "1", "day": "Čet"})))
                } else {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad form"})))
                }
            }),
        );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    let offerings = client
        .offerings(Category::Afternoon, Some("Čet"))
        .await
        .unwrap();
    assert_eq!(offerings[0].name, "Kajak Čet");

    client
        .apply(Category::Afternoon, OfferingId(1), Some("Čet"))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancel_and_roster_send_day_in_query() {
    let router = Router::new()
        .route(
            "/afternoon_application",
            delete(|Query(query): Query<DayQuery>| async move {
                match query.day.as_deref() {
                    Some("Tor") => (StatusCode::OK, Json(json!({"ok": true}))),
                    _ => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "day missing"}))),
                }
            }),
        )
        .route(
            "/group_applications",
            get(|Query(query): Query<DayQuery>| async move {
                Json(json!([{
                    "user_id": "00000000-0000-0000-0000-000000000000",
                    "first_name": "Ana",
                    "surname": "Novak",
                    "day": query.day
                }]))
            }),
        );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    client.cancel(Category::Afternoon, Some("Tor")).await.unwrap();
    assert!(matches!(
        client.cancel(Category::Afternoon, None).await,
        Err(ApiError::Status { status: 422, .. })
    ));

    let roster = client.group_applications("Čet").await.unwrap();
    assert_eq!(roster[0].day.as_deref(), Some("Čet"));
}

#[tokio::test]
async fn server_detail_is_surfaced_in_status_errors() {
    let router = Router::new().route(
        "/apply",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"detail": "Trail is full"}))) }),
    );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());

    let err = client
        .apply(Category::Trail, OfferingId(3), None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            detail: "Trail is full".into()
        }
    );
}

#[tokio::test]
async fn cancellation_is_refused_for_trails_without_request() {
    let client = CampClient::new("http://127.0.0.1:9", Session::in_memory());
    assert_eq!(
        client.cancel(Category::Trail, None).await,
        Err(ApiError::Unsupported("cancellation"))
    );
}

#[tokio::test]
async fn afternoon_flow_against_mock_server() {
    let applied = Arc::new(AtomicUsize::new(0));
    let submissions = Arc::clone(&applied);
    let router = Router::new()
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
                    {"id": 4, "name": "Lokostrelstvo", "description": "Na travniku", "free_spots": 3,
                     "equipment": "Rokavice", "location": "Travnik"}
                ]))
            }),
        )
        .route(
            "/apply_afternoon",
            post(move || {
                let submissions = Arc::clone(&submissions);
                async move {
                    submissions.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"answers": "4"}))
                }
            }),
        );
    let base = spawn(router).await;
    let client = CampClient::new(&base, Session::in_memory());
    let machine = RefCell::new(SelectionMachine::new(
        Category::Afternoon,
        PROGRAM_DAYS.iter().map(ToString::to_string).collect(),
        CancellationPolicy::default(),
    ));

    flow::start(&client, &machine).await.unwrap();
    assert_eq!(machine.borrow().phase(), &Phase::Choosing);
    assert!(machine.borrow_mut().choose(OfferingId(4)));
    flow::submit(&client, &machine).await.unwrap();

    let machine = machine.borrow();
    assert_eq!(machine.phase(), &Phase::Applied);
    assert_eq!(
        machine.applied_offering().and_then(|o| o.location.as_deref()),
        Some("Travnik")
    );
    assert!(machine.is_day_applied("Ned"));
    assert_eq!(applied.load(Ordering::SeqCst), 1);
}
