//! End-to-end tests for the student endpoints.

use reqwest::StatusCode;
use serde_json::{json, Value};
use students_sdk::{ClientError, StudentInput};

mod common;

fn ada() -> StudentInput {
    StudentInput {
        name: "Ada".into(),
        email: "ada@x.io".into(),
        age: 30,
    }
}

#[tokio::test]
async fn test_create_then_get() {
    let server = common::start_server().await;
    let client = common::http_client();

    let res = client
        .post(server.url("/api/students"))
        .json(&json!({"name": "Ada", "email": "ada@x.io", "age": 30}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"message": "Student created successfully", "id": 1})
    );

    let res = client.get(server.url("/api/students/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"id": 1, "name": "Ada", "email": "ada@x.io", "age": 30})
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_create_empty_object_lists_every_field() {
    let server = common::start_server().await;
    let res = common::http_client()
        .post(server.url("/api/students"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({
            "message": "Validation failed",
            "error": "Name is required, Email is required, Age is required",
        })
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_create_reports_each_missing_field() {
    let server = common::start_server().await;
    let client = common::http_client();

    let cases = [
        (json!({"email": "ada@x.io", "age": 30}), "Name is required"),
        (json!({"name": "Ada", "age": 30}), "Email is required"),
        (json!({"name": "Ada", "email": "ada@x.io"}), "Age is required"),
        (json!({"age": 30}), "Name is required, Email is required"),
        (
            json!({"name": "Ada", "email": "nope", "age": 400}),
            "Email is not valid, Age is not valid",
        ),
    ];

    for (body, expected) in cases {
        let res = client
            .post(server.url("/api/students"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
        let value = res.json::<Value>().await.unwrap();
        assert_eq!(value["error"], expected, "{}", body);
    }

    // Nothing was persisted.
    assert!(server.sdk().list_students().await.unwrap().is_empty());
    server.shutdown.trigger();
}

#[tokio::test]
async fn test_empty_body_is_distinct_from_malformed() {
    let server = common::start_server().await;
    let client = common::http_client();

    let res = client.post(server.url("/api/students")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["message"], "Request body is empty");

    let res = client
        .post(server.url("/api/students"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["message"], "Failed to decode request body");
    assert!(!value["error"].as_str().unwrap().is_empty());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_get_with_invalid_id() {
    let server = common::start_server().await;
    let res = common::http_client()
        .get(server.url("/api/students/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["message"], "Invalid student ID");
    assert!(!value["error"].as_str().unwrap().is_empty());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let server = common::start_server().await;
    let err = server.sdk().get_student(99).await.unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.message, "Student not found");
            assert_eq!(body.error, "student not found with id 99");
        }
        other => panic!("unexpected error: {}", other),
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_list_empty_is_array() {
    let server = common::start_server().await;
    let res = common::http_client()
        .get(server.url("/api/students"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_list_after_creates() {
    let server = common::start_server().await;
    let sdk = server.sdk();

    let mut ids = Vec::new();
    for i in 0..5 {
        let input = StudentInput {
            name: format!("Student {}", i),
            email: format!("student{}@school.edu", i),
            age: 18 + i,
        };
        ids.push(sdk.create_student(&input).await.unwrap().id);
    }

    let students = sdk.list_students().await.unwrap();
    assert_eq!(students.len(), 5);
    let listed: Vec<i64> = students.iter().map(|s| s.id).collect();
    assert_eq!(listed, ids);
    for (i, student) in students.iter().enumerate() {
        assert_eq!(student.name, format!("Student {}", i));
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_update_round_trip() {
    let server = common::start_server().await;
    let sdk = server.sdk();

    let id = sdk.create_student(&ada()).await.unwrap().id;
    let updated = StudentInput {
        name: "Ada Lovelace".into(),
        email: "lovelace@x.io".into(),
        age: 36,
    };
    let ack = sdk.update_student(id, &updated).await.unwrap();
    assert_eq!(ack.message, "Student updated successfully");

    let student = sdk.get_student(id).await.unwrap();
    assert_eq!(student.id, id);
    assert_eq!(student.name, "Ada Lovelace");
    assert_eq!(student.email, "lovelace@x.io");
    assert_eq!(student.age, 36);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_update_validates_body() {
    let server = common::start_server().await;
    let id = server.sdk().create_student(&ada()).await.unwrap().id;

    let res = common::http_client()
        .put(server.url(&format!("/api/students/{}", id)))
        .json(&json!({"name": "", "email": "ada@x.io", "age": 30}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["error"], "Name is required");

    assert_eq!(server.sdk().get_student(id).await.unwrap().name, "Ada");
    server.shutdown.trigger();
}

#[tokio::test]
async fn test_delete() {
    let server = common::start_server().await;
    let sdk = server.sdk();

    let id = sdk.create_student(&ada()).await.unwrap().id;
    let ack = sdk.delete_student(id).await.unwrap();
    assert_eq!(ack.message, "Student deleted successfully");

    let err = sdk.get_student(id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    // Deleting again is not an error.
    sdk.delete_student(id).await.unwrap();
    server.shutdown.trigger();
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let server = common::start_server().await;
    let client = common::http_client();

    let res = client.patch(server.url("/api/students")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"message": "Invalid request method", "error": ""})
    );

    let res = client.post(server.url("/api/students/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_route() {
    let server = common::start_server().await;
    let res = common::http_client()
        .get(server.url("/api/courses"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["message"], "Route not found");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_set_and_echoed() {
    let server = common::start_server().await;
    let client = common::http_client();

    let res = client.get(server.url("/api/students")).send().await.unwrap();
    let generated = res.headers().get("x-request-id").expect("request id header");
    assert!(!generated.is_empty());

    let res = client
        .get(server.url("/api/students"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "trace-me-123");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = common::test_config();
    config.limits.max_body_bytes = 64;
    let server = common::start_server_with(config).await;

    let long_name = "a".repeat(256);
    let res = common::http_client()
        .post(server.url("/api/students"))
        .json(&json!({"name": long_name, "email": "ada@x.io", "age": 30}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let value = res.json::<Value>().await.unwrap();
    assert_eq!(value["message"], "Failed to read request body");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_health() {
    let server = common::start_server().await;
    let health = server.sdk().health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.env, "test");
    assert!(!health.version.is_empty());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_non_utf8_id_is_json_error() {
    let server = common::start_server().await;
    let client = common::http_client();

    for res in [
        client.get(server.url("/api/students/%FF")).send().await.unwrap(),
        client.delete(server.url("/api/students/%FF")).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["content-type"], "application/json");
        let value = res.json::<Value>().await.unwrap();
        assert_eq!(value["message"], "Invalid student ID");
        assert!(!value["error"].as_str().unwrap().is_empty());
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_null_body_reports_every_field() {
    let server = common::start_server().await;
    let res = common::http_client()
        .post(server.url("/api/students"))
        .header("content-type", "application/json")
        .body("null")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({
            "message": "Validation failed",
            "error": "Name is required, Email is required, Age is required",
        })
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_storage_failures_are_internal_errors() {
    let server = common::start_failing_server().await;
    let client = common::http_client();
    let body = json!({"name": "Ada", "email": "ada@x.io", "age": 30});

    let cases = [
        (
            client.post(server.url("/api/students")).json(&body),
            "Failed to create student",
        ),
        (client.get(server.url("/api/students/1")), "Failed to fetch student"),
        (client.get(server.url("/api/students")), "Failed to fetch students"),
        (
            client.put(server.url("/api/students/1")).json(&body),
            "Failed to update student",
        ),
        (client.delete(server.url("/api/students/1")), "Failed to delete student"),
    ];

    for (request, message) in cases {
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", message);
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!({"message": message, "error": "storage connection is unavailable"})
        );
    }

    // Input errors are still reported before the repository is touched.
    let res = client.get(server.url("/api/students/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.shutdown.trigger();
}
