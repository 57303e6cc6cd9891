//! Routes for the group resource.
//!
//! Bodies are validated by [`ValidatedJson`] before a handler runs. Past that
//! point every operation answers `501 Not Implemented`.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use swatch_core::{CreateGroup, GroupId, UpdateGroup};

use crate::extract::ValidatedJson;
use crate::server::AppState;

/// Body of every stub response.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Description of the operation that is not available yet.
    pub message: String,
}

/// A `501 Not Implemented` response naming the operation.
#[derive(Debug)]
pub struct NotImplemented(pub String);

impl IntoResponse for NotImplemented {
    fn into_response(self) -> Response {
        let body = MessageBody { message: self.0 };
        (StatusCode::NOT_IMPLEMENTED, Json(body)).into_response()
    }
}

/// Creates the group router, relative to its mount point.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/{id}", put(update_group).delete(delete_group))
}

async fn list_groups() -> NotImplemented {
    tracing::debug!("List groups requested");
    NotImplemented("List groups endpoint (to be implemented)".to_string())
}

async fn create_group(ValidatedJson(body): ValidatedJson<CreateGroup>) -> NotImplemented {
    tracing::debug!(name = %body.name, color = ?body.color, "Create group requested");
    NotImplemented("Create group endpoint (to be implemented)".to_string())
}

async fn update_group(
    Path(id): Path<GroupId>,
    ValidatedJson(body): ValidatedJson<UpdateGroup>,
) -> NotImplemented {
    tracing::debug!(group_id = %id, empty = body.is_empty(), "Update group requested");
    NotImplemented(format!("Update group {id} endpoint (to be implemented)"))
}

async fn delete_group(Path(id): Path<GroupId>) -> NotImplemented {
    tracing::debug!(group_id = %id, "Delete group requested");
    NotImplemented(format!("Delete group {id} endpoint (to be implemented)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::server::ServerConfig;
    use swatch_core::Bindings;

    fn app() -> Router {
        let state = AppState::new(ServerConfig::default(), Bindings::in_memory("test-secret"));
        router().with_state(Arc::new(state))
    }

    async fn send(method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };

        let response = app().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_list_groups_not_implemented() {
        let (status, body) = send(Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body, json!({"message": "List groups endpoint (to be implemented)"}));
    }

    #[tokio::test]
    async fn test_create_group_valid_body() {
        let (status, body) =
            send(Method::POST, "/", Some(r##"{"name":"Work","color":"#FF00FF"}"##)).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body, json!({"message": "Create group endpoint (to be implemented)"}));
    }

    #[tokio::test]
    async fn test_create_group_accepts_valid_variants() {
        let longest = format!(r#"{{"name":"{}"}}"#, "x".repeat(50));
        let bodies = [
            r#"{"name":"W"}"#,
            r##"{"name":"Work","color":"#a1b2c3"}"##,
            longest.as_str(),
        ];

        for payload in bodies {
            let (status, _) = send(Method::POST, "/", Some(payload)).await;
            assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "payload: {payload}");
        }
    }

    #[tokio::test]
    async fn test_create_group_empty_name_rejected() {
        let (status, body) = send(Method::POST, "/", Some(r#"{"name":""}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert!(body["error"]["fields"]["name"].is_array());
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_create_group_rejections() {
        let too_long = format!(r#"{{"name":"{}"}}"#, "x".repeat(51));
        let bodies = [
            "{}",
            r##"{"color":"#FF00FF"}"##,
            r#"{"name":42}"#,
            r#"{"name":"Work","color":"FF00FF"}"#,
            r##"{"name":"Work","color":"#FFF"}"##,
            too_long.as_str(),
            "not json",
        ];

        for payload in bodies {
            let (status, _) = send(Method::POST, "/", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        }
    }

    #[tokio::test]
    async fn test_create_group_without_body_rejected() {
        let (status, _) = send(Method::POST, "/", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_group_empty_body_accepted() {
        let (status, body) = send(Method::PUT, "/abc123", Some("{}")).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            body,
            json!({"message": "Update group abc123 endpoint (to be implemented)"})
        );
    }

    #[tokio::test]
    async fn test_update_group_bad_color_rejected() {
        let (status, body) =
            send(Method::PUT, "/abc123", Some(r#"{"color":"not-a-color"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["fields"]["color"].is_array());
    }

    #[tokio::test]
    async fn test_update_group_partial_name() {
        let (status, _) = send(Method::PUT, "/abc123", Some(r#"{"name":"Home"}"#)).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let (status, _) = send(Method::PUT, "/abc123", Some(r#"{"name":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_group_not_implemented() {
        let (status, body) = send(Method::DELETE, "/abc123", None).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            body,
            json!({"message": "Delete group abc123 endpoint (to be implemented)"})
        );
    }
}
