//! HTTP-level tests against the in-memory wiring

use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::{Role, UserId};
use interface_api::{auth::create_token, config::ApiConfig, create_router, Services};

struct TestUser {
    id: UserId,
    token: String,
}

fn user(name: &str, role: Role, config: &ApiConfig) -> TestUser {
    let id = UserId::new();
    let token = create_token(id, name, role, &config.jwt_secret, config.jwt_expiration_secs)
        .expect("token creation");
    TestUser { id, token }
}

struct Harness {
    server: TestServer,
    client: TestUser,
    employee: TestUser,
    officer: TestUser,
}

fn harness() -> Harness {
    let config = ApiConfig::default();
    let client = user("Ahmed Hassan", Role::Client, &config);
    let employee = user("Sara Khan", Role::Employee, &config);
    let officer = user("Officer Malik", Role::FbrOfficer, &config);

    let server = TestServer::new(create_router(Services::in_memory(), config))
        .expect("test server");

    Harness {
        server,
        client,
        employee,
        officer,
    }
}

/// Drives a draft through submission and returns its id
async fn submitted_return(h: &Harness) -> String {
    let created = h
        .server
        .post("/api/v1/returns")
        .authorization_bearer(&h.client.token)
        .json(&json!({
            "tax_year": 2024,
            "income_entries": [
                { "category": "salary", "amount": "2500000" }
            ]
        }))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

    h.server
        .post(&format!("/api/v1/returns/{id}/documents"))
        .authorization_bearer(&h.client.token)
        .json(&json!({ "file_name": "salary_certificate.pdf" }))
        .await
        .assert_status_ok();
    h.server
        .post(&format!("/api/v1/returns/{id}/declaration"))
        .authorization_bearer(&h.client.token)
        .await
        .assert_status_ok();
    h.server
        .post(&format!("/api/v1/returns/{id}/submit"))
        .authorization_bearer(&h.client.token)
        .await
        .assert_status_ok();

    id
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let h = harness();
        let response = h.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let h = harness();
        let response = h.server.get("/api/v1/returns").await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let h = harness();
        let response = h
            .server
            .get("/api/v1/returns")
            .authorization_bearer("not-a-token")
            .await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let h = harness();
        let response = h
            .server
            .post("/api/v1/returns")
            .authorization_bearer(&h.employee.token)
            .json(&json!({ "tax_year": 2024, "income_entries": [] }))
            .await;
        response.assert_status(axum::http::StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_review_queue_denied_to_clients() {
        let h = harness();
        let response = h
            .server
            .get("/api/v1/review/queue")
            .authorization_bearer(&h.client.token)
            .await;
        response.assert_status(axum::http::StatusCode::FORBIDDEN);
    }
}

mod filing {
    use super::*;

    #[tokio::test]
    async fn test_full_lifecycle_over_http() {
        let h = harness();
        let id = submitted_return(&h).await;

        h.server
            .post(&format!("/api/v1/returns/{id}/review"))
            .authorization_bearer(&h.employee.token)
            .await
            .assert_status_ok();
        h.server
            .post(&format!("/api/v1/returns/{id}/assessment"))
            .authorization_bearer(&h.employee.token)
            .json(&json!({
                "total_income": "2500000",
                "exemptions": "0",
                "tax_rate_percent": "5",
                "tax_credits": "0"
            }))
            .await
            .assert_status_ok();
        let verified = h
            .server
            .post(&format!("/api/v1/returns/{id}/verification"))
            .authorization_bearer(&h.employee.token)
            .json(&json!({ "outcome": "approved" }))
            .await;
        verified.assert_status_ok();
        let body = verified.json::<Value>();
        assert_eq!(body["employee_status"], "approved");
        assert_eq!(body["total_tax"].as_str().unwrap().parse::<f64>().unwrap(), 125000.0);

        let queue = h
            .server
            .get("/api/v1/review/queue")
            .authorization_bearer(&h.officer.token)
            .await;
        queue.assert_status_ok();
        assert_eq!(queue.json::<Value>().as_array().unwrap().len(), 1);

        h.server
            .post(&format!("/api/v1/review/{id}/take-up"))
            .authorization_bearer(&h.officer.token)
            .await
            .assert_status_ok();

        let decided = h
            .server
            .post(&format!("/api/v1/review/{id}/decision"))
            .authorization_bearer(&h.officer.token)
            .json(&json!({ "ruling": "approved", "notes": "Clean filing" }))
            .await;
        decided.assert_status_ok();
        let decision = decided.json::<Value>();
        assert_eq!(decision["ruling"], "approved");
        assert_eq!(decision["fbr_status"], "approved");
        assert_eq!(decision["decided_by"], "Officer Malik");

        // The client's feed saw both the submission and the ruling.
        let feed = h
            .server
            .get("/api/v1/notifications")
            .authorization_bearer(&h.client.token)
            .await;
        feed.assert_status_ok();
        let titles: Vec<String> = feed
            .json::<Value>()
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap().to_string())
            .collect();
        assert!(titles.contains(&"Return Submitted".to_string()));
        assert!(titles.contains(&"Return Approved".to_string()));
    }

    #[tokio::test]
    async fn test_submit_without_document_is_unprocessable() {
        let h = harness();
        let created = h
            .server
            .post("/api/v1/returns")
            .authorization_bearer(&h.client.token)
            .json(&json!({ "tax_year": 2024, "income_entries": [] }))
            .await;
        let id = created.json::<Value>()["id"].as_str().unwrap().to_string();

        let response = h
            .server
            .post(&format!("/api/v1/returns/{id}/submit"))
            .authorization_bearer(&h.client.token)
            .await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_double_submit_conflicts() {
        let h = harness();
        let id = submitted_return(&h).await;

        let response = h
            .server
            .post(&format!("/api/v1/returns/{id}/submit"))
            .authorization_bearer(&h.client.token)
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_return_is_not_found() {
        let h = harness();
        let response = h
            .server
            .get(&format!("/api/v1/returns/TRN-{}", uuid::Uuid::new_v4()))
            .authorization_bearer(&h.client.token)
            .await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let h = harness();
        let response = h
            .server
            .get("/api/v1/returns/not-an-id")
            .authorization_bearer(&h.client.token)
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_the_caller() {
        let h = harness();
        submitted_return(&h).await;

        let config = ApiConfig::default();
        let other = user("Bilal Raza", Role::Client, &config);
        let response = h
            .server
            .get("/api/v1/returns")
            .authorization_bearer(&other.token)
            .await;
        response.assert_status_ok();
        assert!(response.json::<Value>().as_array().unwrap().is_empty());
    }
}

mod request_threads {
    use super::*;

    #[tokio::test]
    async fn test_thread_reply_and_resolution() {
        let h = harness();
        let return_id = submitted_return(&h).await;

        let opened = h
            .server
            .post("/api/v1/requests")
            .authorization_bearer(&h.employee.token)
            .json(&json!({
                "return_id": return_id,
                "client_id": h.client.id.to_string(),
                "client_name": "Ahmed Hassan",
                "subject": "Missing rental income details",
                "message": "Please provide the tenancy agreement."
            }))
            .await;
        opened.assert_status(axum::http::StatusCode::CREATED);
        let request_id = opened.json::<Value>()["id"].as_str().unwrap().to_string();

        let replied = h
            .server
            .post(&format!("/api/v1/requests/{request_id}/replies"))
            .authorization_bearer(&h.client.token)
            .json(&json!({ "body": "Uploaded the agreement." }))
            .await;
        replied.assert_status_ok();
        assert_eq!(replied.json::<Value>()["status"], "in_progress");

        h.server
            .post(&format!("/api/v1/requests/{request_id}/resolve"))
            .authorization_bearer(&h.employee.token)
            .await
            .assert_status_ok();

        // Replies to a resolved thread conflict.
        let late = h
            .server
            .post(&format!("/api/v1/requests/{request_id}/replies"))
            .authorization_bearer(&h.client.token)
            .json(&json!({ "body": "One more thing" }))
            .await;
        late.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_empty_subject_is_rejected() {
        let h = harness();
        let return_id = submitted_return(&h).await;

        let response = h
            .server
            .post("/api/v1/requests")
            .authorization_bearer(&h.employee.token)
            .json(&json!({
                "return_id": return_id,
                "client_id": h.client.id.to_string(),
                "client_name": "Ahmed Hassan",
                "subject": "",
                "message": "x"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod billing {
    use super::*;
    use chrono::{Days, Utc};

    #[tokio::test]
    async fn test_bill_generation_and_payment() {
        let h = harness();
        let due = Utc::now().date_naive() + Days::new(30);

        let generated = h
            .server
            .post("/api/v1/bills")
            .authorization_bearer(&h.employee.token)
            .json(&json!({
                "client_id": h.client.id.to_string(),
                "description": "Tax Filing Services - FY 2024",
                "amount": "35000",
                "due_date": due,
                "items": [
                    { "name": "Tax Return Preparation", "amount": "25000" },
                    { "name": "Consultation", "amount": "5000" },
                    { "name": "Document Processing", "amount": "5000" }
                ]
            }))
            .await;
        generated.assert_status(axum::http::StatusCode::CREATED);
        let body = generated.json::<Value>();
        assert_eq!(body["status"], "pending");
        assert_eq!(body["currency"], "PKR");
        let bill_id = body["id"].as_str().unwrap().to_string();

        let paid = h
            .server
            .post(&format!("/api/v1/bills/{bill_id}/pay"))
            .authorization_bearer(&h.client.token)
            .await;
        paid.assert_status_ok();
        assert_eq!(paid.json::<Value>()["status"], "paid");

        // Settled bills cannot be cancelled.
        let cancelled = h
            .server
            .post(&format!("/api/v1/bills/{bill_id}/cancel"))
            .authorization_bearer(&h.employee.token)
            .await;
        cancelled.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_mismatched_line_items_rejected() {
        let h = harness();
        let due = Utc::now().date_naive() + Days::new(7);

        let response = h
            .server
            .post("/api/v1/bills")
            .authorization_bearer(&h.employee.token)
            .json(&json!({
                "client_id": h.client.id.to_string(),
                "description": "Consultation",
                "amount": "5000",
                "due_date": due,
                "items": [ { "name": "Consultation", "amount": "4000" } ]
            }))
            .await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod notifications {
    use super::*;

    #[tokio::test]
    async fn test_unread_count_and_mark_read() {
        let h = harness();
        submitted_return(&h).await;

        let count = h
            .server
            .get("/api/v1/notifications/unread-count")
            .authorization_bearer(&h.client.token)
            .await;
        count.assert_status_ok();
        assert_eq!(count.json::<Value>()["unread"], 1);

        let feed = h
            .server
            .get("/api/v1/notifications")
            .authorization_bearer(&h.client.token)
            .await;
        let notification_id = feed.json::<Value>()[0]["id"].as_str().unwrap().to_string();

        h.server
            .post(&format!("/api/v1/notifications/{notification_id}/read"))
            .authorization_bearer(&h.client.token)
            .await
            .assert_status_ok();

        let count = h
            .server
            .get("/api/v1/notifications/unread-count")
            .authorization_bearer(&h.client.token)
            .await;
        assert_eq!(count.json::<Value>()["unread"], 0);
    }

    #[tokio::test]
    async fn test_cannot_read_another_users_entry() {
        let h = harness();
        submitted_return(&h).await;

        let feed = h
            .server
            .get("/api/v1/notifications")
            .authorization_bearer(&h.client.token)
            .await;
        let notification_id = feed.json::<Value>()[0]["id"].as_str().unwrap().to_string();

        let response = h
            .server
            .post(&format!("/api/v1/notifications/{notification_id}/read"))
            .authorization_bearer(&h.employee.token)
            .await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
    }
}
