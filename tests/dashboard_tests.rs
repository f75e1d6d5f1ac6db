// tests/dashboard_tests.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use teacher_dashboard::{config::Config, routes, state::AppState, utils::jwt::sign_jwt};

const SECRET: &str = "dashboard_test_secret";

/// Stand-in for the exam API. `None` exams or a missing attempts entry answer 500.
/// A status override wins over any body.
#[derive(Clone, Default)]
struct FakeExamApi {
    exams: Option<Value>,
    exams_status: Option<StatusCode>,
    attempts: HashMap<String, Value>,
    attempt_statuses: HashMap<String, StatusCode>,
    seen_auth: Arc<Mutex<Vec<String>>>,
}

fn record_auth(api: &FakeExamApi, headers: &HeaderMap) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    api.seen_auth.lock().unwrap().push(auth);
}

async fn fake_list_exams(State(api): State<FakeExamApi>, headers: HeaderMap) -> Response {
    record_auth(&api, &headers);
    if let Some(status) = api.exams_status {
        return status.into_response();
    }
    match api.exams {
        Some(exams) => Json(exams).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn fake_list_attempts(
    State(api): State<FakeExamApi>,
    Path(exam_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record_auth(&api, &headers);
    if let Some(status) = api.attempt_statuses.get(&exam_id) {
        return status.into_response();
    }
    match api.attempts.get(&exam_id) {
        Some(attempts) => Json(attempts.clone()).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn spawn_fake_exam_api(api: FakeExamApi) -> String {
    let app = Router::new()
        .route("/exams", get(fake_list_exams))
        .route("/attempts/exam/{exam_id}", get(fake_list_attempts))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// Spawns the dashboard pointed at `api_base_url`; returns its base URL.
async fn spawn_app(api_base_url: &str) -> String {
    let config = Config {
        api_base_url: api_base_url.parse().unwrap(),
        jwt_secret: SECRET.to_string(),
        fetch_timeout: Duration::from_secs(5),
        fetch_concurrency: 4,
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        rust_log: "error".to_string(),
    };

    let state = AppState::new(config).expect("Failed to build state");
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn teacher_token() -> String {
    sign_jwt("t1", Some("Ms. Hoa"), "TEACHER", SECRET, 600).unwrap()
}

async fn get_dashboard(address: &str, token: &str) -> Value {
    let response = reqwest::Client::new()
        .get(format!("{}/api/teacher/dashboard", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    response.json().await.expect("Failed to parse dashboard json")
}

fn submitted(name: &str, username: &str, score: f64, at: &str) -> Value {
    json!({
        "id": format!("{}-{}", username, at),
        "student": { "id": username, "name": name, "username": username },
        "score": score,
        "submittedAt": at
    })
}

#[tokio::test]
async fn dashboard_aggregates_upstream_data() {
    // Arrange
    let api = FakeExamApi {
        exams: Some(json!([
            {
                "id": "e1",
                "title": "Math",
                "subject": "Algebra",
                "createdAt": "2024-01-02T08:00:00.000Z",
                "_count": { "attempts": 3 }
            },
            {
                "id": "e2",
                "title": "Bio",
                "createdAt": "2024-01-03T08:00:00.000Z"
            }
        ])),
        attempts: HashMap::from([
            (
                "e1".to_string(),
                json!([
                    submitted("Lan", "lan01", 90.0, "2024-01-05T10:00:00.000Z"),
                    { "id": "pending", "student": { "name": "Binh" }, "score": null, "submittedAt": null },
                    submitted("Minh", "minh02", 45.5, "2024-01-06T07:30:00.000Z")
                ]),
            ),
            (
                "e2".to_string(),
                json!([{ "id": "anon", "score": 60, "submittedAt": "2024-01-04T12:00:00.000Z" }]),
            ),
        ]),
        ..Default::default()
    };
    let seen_auth = api.seen_auth.clone();
    let api_base = spawn_fake_exam_api(api).await;
    let address = spawn_app(&api_base).await;
    let token = teacher_token();

    // Act
    let body = get_dashboard(&address, &token).await;

    // Assert
    assert!(body["error"].is_null());
    assert_eq!(body["greeting_name"], "Ms. Hoa");

    let exams = body["recent_exams"].as_array().unwrap();
    assert_eq!(exams.len(), 2);
    assert_eq!(exams[0]["title"], "Bio");
    assert_eq!(exams[0]["subject"], "N/A");
    assert_eq!(exams[0]["participants"], 0);
    assert_eq!(exams[1]["title"], "Math");
    assert_eq!(exams[1]["participants"], 3);
    assert_eq!(exams[1]["date_label"], "02/01/2024");

    let results = body["recent_results"].as_array().unwrap();
    assert_eq!(results.len(), 3, "unsubmitted attempt must be excluded");
    assert_eq!(results[0]["student_name"], "Minh");
    assert_eq!(results[0]["tier"], "low");
    assert_eq!(results[0]["submitted_label"], "06/01/2024 07:30");
    assert_eq!(results[1]["student_name"], "Lan");
    assert_eq!(results[1]["tier"], "high");
    assert_eq!(results[2]["student_name"], "Unknown");
    assert_eq!(results[2]["student_id"], "N/A");
    assert_eq!(results[2]["exam_title"], "Bio");
    assert_eq!(results[2]["tier"], "medium");

    assert_eq!(body["stats"]["total_exams"], 2);
    assert_eq!(body["stats"]["new_results"], 3);
    assert_eq!(body["stats"]["total_participants"], 3);

    // The caller's token is forwarded on every upstream call.
    let seen = seen_auth.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|auth| *auth == format!("Bearer {}", token)));
}

#[tokio::test]
async fn failing_attempt_fetch_only_drops_that_exam() {
    // Arrange: no attempts entry for e2, so the fake answers 500.
    let api = FakeExamApi {
        exams: Some(json!([
            { "id": "e1", "title": "Math", "createdAt": "2024-01-02" },
            { "id": "e2", "title": "Bio", "createdAt": "2024-01-03" }
        ])),
        attempts: HashMap::from([(
            "e1".to_string(),
            json!([submitted("Lan", "lan01", 90.0, "2024-01-05")]),
        )]),
        ..Default::default()
    };
    let address = spawn_app(&spawn_fake_exam_api(api).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].is_null());
    assert_eq!(body["recent_exams"].as_array().unwrap().len(), 2);
    let results = body["recent_results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["exam_title"], "Math");
    assert_eq!(results[0]["score"], 90.0);
}

#[tokio::test]
async fn failing_exam_list_gives_empty_dashboard() {
    // Arrange
    let address = spawn_app(&spawn_fake_exam_api(FakeExamApi::default()).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].as_str().unwrap().contains("500"));
    assert!(body["recent_exams"].as_array().unwrap().is_empty());
    assert!(body["recent_results"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["total_participants"], 0);
}

#[tokio::test]
async fn unreachable_exam_api_gives_empty_dashboard() {
    // Arrange: bind then drop a listener so nothing is listening on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    drop(listener);
    let address = spawn_app(&dead).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].as_str().unwrap().starts_with("transport error"));
    assert!(body["recent_exams"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_is_bounded() {
    // Arrange: 8 exams with 2 submitted attempts each.
    let exams: Vec<Value> = (1..=8)
        .map(|i| {
            json!({
                "id": format!("e{}", i),
                "title": format!("Exam {}", i),
                "createdAt": format!("2024-05-0{}T09:00:00Z", i),
                "_count": { "attempts": 2 }
            })
        })
        .collect();
    let attempts: HashMap<String, Value> = (1..=8)
        .map(|i| {
            (
                format!("e{}", i),
                json!([
                    submitted("A", "a", 70.0, &format!("2024-06-{:02}T09:00:00Z", i)),
                    submitted("B", "b", 70.0, &format!("2024-06-{:02}T10:00:00Z", i))
                ]),
            )
        })
        .collect();
    let api = FakeExamApi {
        exams: Some(Value::Array(exams)),
        attempts,
        ..Default::default()
    };
    let address = spawn_app(&spawn_fake_exam_api(api).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    let recent_exams = body["recent_exams"].as_array().unwrap();
    assert_eq!(recent_exams.len(), 5);
    assert_eq!(recent_exams[0]["id"], "e8");
    assert_eq!(recent_exams[4]["id"], "e4");
    assert_eq!(body["stats"]["total_participants"], 10);

    let results = body["recent_results"].as_array().unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(results[0]["exam_title"], "Exam 8");
    assert_eq!(results[0]["student_name"], "B");
    assert_eq!(results[9]["exam_title"], "Exam 4");
    assert_eq!(results[9]["student_name"], "A");
}

#[tokio::test]
async fn rejected_token_upstream_reports_authorization_error() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        // Arrange
        let api = FakeExamApi {
            exams: Some(json!([])),
            exams_status: Some(status),
            ..Default::default()
        };
        let address = spawn_app(&spawn_fake_exam_api(api).await).await;

        // Act
        let body = get_dashboard(&address, &teacher_token()).await;

        // Assert
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("authorization error"), "{status}: {error}");
        assert!(body["recent_exams"].as_array().unwrap().is_empty());
        assert!(body["recent_results"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn malformed_exam_list_reports_decode_error() {
    // Arrange: 200 with an object where an array is expected.
    let api = FakeExamApi {
        exams: Some(json!({ "data": [{ "id": "e1", "title": "Math" }] })),
        ..Default::default()
    };
    let address = spawn_app(&spawn_fake_exam_api(api).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].as_str().unwrap().starts_with("decode error"));
    assert!(body["recent_exams"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["total_exams"], 0);
}

#[tokio::test]
async fn forbidden_attempts_only_drop_that_exam() {
    // Arrange
    let api = FakeExamApi {
        exams: Some(json!([
            { "id": "e1", "title": "Math", "createdAt": "2024-01-02" },
            { "id": "e2", "title": "Bio", "createdAt": "2024-01-03" }
        ])),
        attempts: HashMap::from([
            ("e1".to_string(), json!([submitted("Lan", "lan01", 90.0, "2024-01-05")])),
            ("e2".to_string(), json!([submitted("Minh", "minh02", 70.0, "2024-01-06")])),
        ]),
        attempt_statuses: HashMap::from([("e2".to_string(), StatusCode::FORBIDDEN)]),
        ..Default::default()
    };
    let address = spawn_app(&spawn_fake_exam_api(api).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].is_null());
    assert_eq!(body["recent_exams"].as_array().unwrap().len(), 2);
    let results = body["recent_results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["exam_title"], "Math");
}

#[tokio::test]
async fn null_creation_timestamp_keeps_dashboard() {
    // Arrange
    let api = FakeExamApi {
        exams: Some(json!([
            { "id": "e1", "title": "Math", "createdAt": null, "_count": { "attempts": 2 } },
            { "id": "e2", "title": "Bio", "createdAt": "2024-01-03", "_count": { "attempts": 1 } }
        ])),
        attempts: HashMap::from([
            ("e1".to_string(), json!([])),
            ("e2".to_string(), json!([])),
        ]),
        ..Default::default()
    };
    let address = spawn_app(&spawn_fake_exam_api(api).await).await;

    // Act
    let body = get_dashboard(&address, &teacher_token()).await;

    // Assert
    assert!(body["error"].is_null());
    let exams = body["recent_exams"].as_array().unwrap();
    assert_eq!(exams.len(), 2);
    assert_eq!(exams[0]["title"], "Bio");
    assert_eq!(exams[1]["title"], "Math");
    assert_eq!(exams[1]["date"], "");
    assert_eq!(body["stats"]["total_participants"], 3);
}
