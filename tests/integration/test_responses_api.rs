//! Response endpoint integration tests

use axum::http::StatusCode;
use safereport_api::reference_code;
use safereport_api::routes;
use serde_json::{Value, json};

fn test_server() -> axum_test::TestServer {
    let app_state = routes::create_app_state();
    let app = axum::Router::new()
        .nest("/api/v1", routes::create_api_router())
        .with_state(app_state);
    axum_test::TestServer::new(app).unwrap()
}

async fn create_form(server: &axum_test::TestServer) -> String {
    let response = server
        .post("/api/v1/forms")
        .json(&json!({
            "title": "Incident report",
            "questions": [
                {
                    "id": "q1",
                    "question": "What happened?",
                    "type": "textarea",
                    "required": true
                }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let form: Value = response.json();
    form["id"].as_str().unwrap().to_string()
}

async fn create_response(server: &axum_test::TestServer, form_id: &str) -> Value {
    let response = server
        .post("/api/v1/responses")
        .json(&json!({
            "form_id": form_id,
            "data": { "q1": "Something happened in the corridor" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_created_responses_have_distinct_valid_codes() {
    let server = test_server();
    let form_id = create_form(&server).await;

    let r1 = create_response(&server, &form_id).await;
    let r2 = create_response(&server, &form_id).await;

    let c1 = r1["reference_code"].as_str().unwrap();
    let c2 = r2["reference_code"].as_str().unwrap();
    assert_ne!(c1, c2);
    assert!(reference_code::validate_format(c1));
    assert!(reference_code::validate_format(c2));

    // Defaults: submitted status with a creation-time submitted_at stamp
    assert_eq!(r1["status"], "submitted");
    assert_eq!(r1["priority"], "medium");
    assert!(r1["submitted_at"].as_str().is_some());
}

#[tokio::test]
async fn test_create_response_for_unknown_form_is_404() {
    let server = test_server();
    let response = server
        .post("/api/v1/responses")
        .json(&json!({
            "form_id": "00000000-0000-0000-0000-000000000000",
            "data": {}
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookup_by_reference_code() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let created = create_response(&server, &form_id).await;
    let code = created["reference_code"].as_str().unwrap();

    let found: Value = server
        .get(&format!("/api/v1/responses/reference/{}", code))
        .await
        .json();
    assert_eq!(found["id"], created["id"]);

    // Well-formed but unknown code
    let missing = server
        .get("/api/v1/responses/reference/ABCD-EFGH-JKLM")
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    // Malformed code is rejected before any lookup
    let malformed = server.get("/api/v1/responses/reference/not-a-code").await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_keeps_submitted_at_but_submit_restamps() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let created = create_response(&server, &form_id).await;
    let id = created["id"].as_str().unwrap();
    let original_stamp = created["submitted_at"].clone();

    // Re-submitting through the update path never moves the stamp
    let updated: Value = server
        .patch(&format!("/api/v1/responses/{}", id))
        .json(&json!({ "status": "submitted", "notes": "double-checked" }))
        .await
        .json();
    assert_eq!(updated["submitted_at"], original_stamp);

    // The dedicated submit operation always overwrites it
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let submitted: Value = server
        .post(&format!("/api/v1/responses/{}/submit", id))
        .await
        .json();
    assert_eq!(submitted["status"], "submitted");
    assert_ne!(submitted["submitted_at"], original_stamp);
}

#[tokio::test]
async fn test_reviewing_twice_bumps_reviewed_at() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let created = create_response(&server, &form_id).await;
    let id = created["id"].as_str().unwrap();

    let first: Value = server
        .patch(&format!("/api/v1/responses/{}", id))
        .json(&json!({ "status": "reviewed" }))
        .await
        .json();
    let first_stamp = first["reviewed_at"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second: Value = server
        .patch(&format!("/api/v1/responses/{}", id))
        .json(&json!({ "status": "reviewed" }))
        .await
        .json();
    let second_stamp = second["reviewed_at"].as_str().unwrap();
    assert_ne!(second_stamp, first_stamp);
}

#[tokio::test]
async fn test_triage_fields_update_with_status() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let created = create_response(&server, &form_id).await;
    let id = created["id"].as_str().unwrap();

    let updated: Value = server
        .patch(&format!("/api/v1/responses/{}", id))
        .json(&json!({
            "priority": "urgent",
            "tags": ["safeguarding"],
            "notes": "needs same-day review"
        }))
        .await
        .json();
    assert_eq!(updated["priority"], "urgent");
    assert_eq!(updated["tags"][0], "safeguarding");
    assert_eq!(updated["status"], "submitted", "status untouched");
}

#[tokio::test]
async fn test_list_pagination() {
    let server = test_server();
    let form_id = create_form(&server).await;
    for _ in 0..25 {
        create_response(&server, &form_id).await;
    }

    let page1: Value = server
        .get("/api/v1/responses?page=1&page_size=10")
        .await
        .json();
    assert_eq!(page1["total"], 25);
    assert_eq!(page1["total_pages"], 3);
    assert_eq!(page1["data"].as_array().unwrap().len(), 10);

    let page3: Value = server
        .get("/api/v1/responses?page=3&page_size=10")
        .await
        .json();
    assert_eq!(page3["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_filters_by_status_and_search() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let first = create_response(&server, &form_id).await;
    create_response(&server, &form_id).await;

    let id = first["id"].as_str().unwrap();
    server
        .patch(&format!("/api/v1/responses/{}", id))
        .json(&json!({ "status": "closed", "notes": "resolved on site" }))
        .await;

    let closed: Value = server.get("/api/v1/responses?status=closed").await.json();
    assert_eq!(closed["total"], 1);
    assert_eq!(closed["data"][0]["id"], first["id"]);

    let searched: Value = server.get("/api/v1/responses?search=resolved").await.json();
    assert_eq!(searched["total"], 1);

    let no_hit: Value = server.get("/api/v1/responses?search=zzzzzz").await.json();
    assert_eq!(no_hit["total"], 0);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let first = create_response(&server, &form_id).await;
    create_response(&server, &form_id).await;

    server
        .patch(&format!(
            "/api/v1/responses/{}",
            first["id"].as_str().unwrap()
        ))
        .json(&json!({ "status": "reviewed", "priority": "high" }))
        .await;

    let stats: Value = server.get("/api/v1/responses/stats").await.json();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["by_status"]["reviewed"], 1);
    assert_eq!(stats["by_status"]["submitted"], 1);
    assert_eq!(stats["by_priority"]["high"], 1);
    assert_eq!(stats["by_priority"]["medium"], 1);

    let scoped: Value = server
        .get(&format!("/api/v1/responses/stats?form_id={}", form_id))
        .await
        .json();
    assert_eq!(scoped["total"], 2);
}

#[tokio::test]
async fn test_delete_response() {
    let server = test_server();
    let form_id = create_form(&server).await;
    let created = create_response(&server, &form_id).await;
    let id = created["id"].as_str().unwrap();

    let deleted = server.delete(&format!("/api/v1/responses/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let gone = server.get(&format!("/api/v1/responses/{}", id)).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);

    let again = server.delete(&format!("/api/v1/responses/{}", id)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_response_is_404() {
    let server = test_server();
    let response = server
        .get("/api/v1/responses/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
