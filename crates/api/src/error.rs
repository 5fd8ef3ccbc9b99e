use acquire::AcquireError;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use extract::ExtractError;
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::PipelineError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadInput(&'static str),

    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    request_id: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadInput(_) => "missing_input",
            ApiError::Malformed(_) => "bad_request",
            ApiError::Pipeline(PipelineError::Acquire(e)) => match e {
                AcquireError::InvalidUrl(_) => "invalid_url",
                AcquireError::FutureDate { .. } => "future_date",
                AcquireError::Fetch { .. } => "fetch_failed",
            },
            ApiError::Pipeline(PipelineError::Extract(e)) => match e {
                ExtractError::Empty => "extraction_failed",
                ExtractError::NoClaimsFound => "no_claims",
                ExtractError::Model(_) => "model_unavailable",
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            "missing_input" | "bad_request" | "invalid_url" | "future_date" => StatusCode::BAD_REQUEST,
            "fetch_failed" => StatusCode::BAD_GATEWAY,
            "extraction_failed" | "no_claims" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// What the reader is told. Never includes upstream error detail.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadInput(message) => message.to_string(),
            ApiError::Pipeline(PipelineError::Acquire(AcquireError::FutureDate { year })) => format!(
                "The URL refers to a date in the future ({}). Please check the address and try again.",
                year
            ),
            _ => match self.code() {
                "bad_request" => "We couldn't read that request. Please check the input and try again.",
                "invalid_url" => "That doesn't look like a valid web address. Please check the URL and try again.",
                "fetch_failed" => {
                    "We couldn't retrieve readable content from that URL. The site may be unavailable \
                     or blocking automated access. Try pasting the article text instead."
                }
                "extraction_failed" => "There was no readable content to fact-check.",
                "no_claims" => "No verifiable factual claims were found in this content.",
                _ => "The analysis service is temporarily unavailable. Please try again in a moment.",
            }
            .to_string(),
        }
    }

    /// Log the full error under a fresh request id and return the id.
    pub fn log(&self) -> Uuid {
        let request_id = Uuid::new_v4();
        if self.status().is_server_error() {
            tracing::error!(%request_id, code = self.code(), error = %self, "Fact check failed");
        } else {
            tracing::info!(%request_id, code = self.code(), error = %self, "Fact check rejected");
        }
        request_id
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = self.log();
        let body = ErrorBody {
            error: self.code(),
            message: self.user_message(),
            request_id: request_id.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message_hides_detail() {
        let err = ApiError::from(PipelineError::from(AcquireError::Fetch {
            url: "https://news.example.org/a".to_string(),
            primary: Some("401 bad api key sk-secret".to_string()),
            fallback: "connection refused".to_string(),
        }));

        assert_eq!(err.code(), "fetch_failed");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let message = err.user_message();
        assert!(!message.contains("sk-secret"));
        assert!(!message.contains("refused"));
    }

    #[test]
    fn test_status_per_kind() {
        let empty = ApiError::from(PipelineError::from(ExtractError::Empty));
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let model = ApiError::from(PipelineError::from(ExtractError::Model(anyhow::anyhow!("timeout"))));
        assert_eq!(model.status(), StatusCode::SERVICE_UNAVAILABLE);

        let future = ApiError::from(PipelineError::from(AcquireError::FutureDate { year: 2999 }));
        assert_eq!(future.status(), StatusCode::BAD_REQUEST);
        assert!(future.user_message().contains("2999"));

        assert_eq!(ApiError::BadInput("Please enter a URL").user_message(), "Please enter a URL");

        let malformed = ApiError::Malformed("Failed to parse the request body as JSON: EOF".to_string());
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert!(!malformed.user_message().contains("EOF"));
    }
}
