//! Request extractors.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use swatch_core::Error;
use validator::Validate;

use crate::error::ErrorResponse;

/// JSON body that has been parsed and validated before the handler runs.
///
/// Any failure short-circuits the request with `400 Bad Request`, so the
/// handler only ever sees bodies that satisfy `T`'s validation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Why a [`ValidatedJson`] body was rejected.
#[derive(Debug)]
pub enum BodyRejection {
    /// The body was missing, not JSON, or did not match the expected shape.
    Malformed(JsonRejection),
    /// The body parsed but broke a field rule.
    Invalid(Error),
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(BodyRejection::Malformed)?;
        value
            .validate()
            .map_err(|e| BodyRejection::Invalid(e.into()))?;
        Ok(Self(value))
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected malformed body");
                let body = ErrorResponse::new(rejection.body_text(), "invalid_request_error");
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            },
            Self::Invalid(err) => {
                tracing::debug!(error = %err, "Rejected invalid body");
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                let mut body = ErrorResponse::new("Invalid request body", "invalid_request_error");
                if let Error::Validation(errors) = &err {
                    body = body.with_validation_errors(errors);
                }
                (status, Json(body)).into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use swatch_core::CreateGroup;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failure_carries_fields() {
        let errors = CreateGroup {
            name: String::new(),
            color: None,
        }
        .validate()
        .unwrap_err();

        let response = BodyRejection::Invalid(Error::from(errors)).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert!(json["error"]["fields"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_non_client_error_is_server_error() {
        let response = BodyRejection::Invalid(Error::internal("boom")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].get("fields").is_none());
    }
}
