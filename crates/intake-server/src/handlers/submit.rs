//! Submit handler

use crate::error::ApiError;
use crate::extractors::JsonOrForm;
use crate::storage::StorageError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    success: bool,
    message: String,
    id: i64,
}

pub async fn submit(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let name = req.name.as_deref().unwrap_or("");
    let email = req.email.as_deref().unwrap_or("");

    if name.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    let id = state
        .db
        .insert_record(name, email, req.phone.as_deref())
        .await
        .map_err(|e| {
            match &e {
                StorageError::DuplicateEmail => info!("Rejected duplicate email: {}", email),
                StorageError::Database(db_err) => error!("Insert failed: {}", db_err),
            }
            ApiError::from(e)
        })?;

    info!("Stored record {} for {}", id, email);

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Data saved successfully".to_string(),
            id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;
    use crate::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = Database::in_memory().await.unwrap();
        let state = AppState { db: Arc::new(db) };
        Router::new()
            .route("/submit", post(super::submit))
            .route("/users", get(crate::handlers::users::list))
            .with_state(state)
    }

    fn json_submit(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_submit_created() {
        let app = test_app().await;

        let response = app
            .oneshot(json_submit(r#"{"name":"Alice","email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Data saved successfully");
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_submit_form_encoded() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/submit")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("name=Alice&email=a%40x.com&phone=555-1234"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_submit_duplicate_email_conflict() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_submit(r#"{"name":"Alice","email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_submit(r#"{"name":"Bob","email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Email already exists");
    }

    #[tokio::test]
    async fn test_submit_missing_name_rejected() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_submit(r#"{"email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Name and email are required");

        // No record was created
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_submit_empty_email_rejected() {
        let app = test_app().await;

        let response = app
            .oneshot(json_submit(r#"{"name":"Alice","email":""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_malformed_json_rejected() {
        let app = test_app().await;

        let response = app
            .oneshot(json_submit(r#"{"name": "Alice""#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_submit_phone_optional() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_submit(r#"{"name":"Alice","email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"][0]["phone"], Value::Null);
    }
}
