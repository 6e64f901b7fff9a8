//! Error responses for the site.
//!
//! Errors are returned as short plain-text bodies. Server-side failures are
//! logged with detail and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::contact::DispatchError;
use crate::template::TemplateError;

/// Message shown for every 500 response.
pub const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";

/// An HTTP error with a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an internal server error with the generic message.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<DispatchError> for WebError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Rejected(reason) => WebError::bad_request(reason.to_string()),
            // already logged by the dispatcher
            DispatchError::NotConfigured | DispatchError::Transport(_) => WebError::internal(),
        }
    }
}

impl From<TemplateError> for WebError {
    fn from(err: TemplateError) -> Self {
        tracing::error!(error = %err, "Template rendering failed");
        WebError::internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactError;
    use crate::mail::MailError;
    use http_body_util::BodyExt;

    #[test]
    fn test_rejections_are_bad_requests() {
        let err: WebError = DispatchError::Rejected(ContactError::Honeypot).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Bot detected");

        let err: WebError = DispatchError::Rejected(ContactError::LineBreak).into();
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_server_failures_hide_detail() {
        let transport = DispatchError::Transport(MailError::Api {
            status: 401,
            body: "secret detail".to_string(),
        });

        for err in [transport, DispatchError::NotConfigured] {
            let err: WebError = err.into();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.message(), INTERNAL_MESSAGE);
        }
    }

    #[test]
    fn test_template_error_is_internal() {
        let err: WebError = TemplateError::NotFound("index".to_string()).into();
        assert_eq!(err, WebError::internal());
    }

    #[tokio::test]
    async fn test_into_response_plain_text() {
        let response = WebError::bad_request("Missing fields").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Missing fields");
    }
}
