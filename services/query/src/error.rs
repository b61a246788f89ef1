use std::borrow::Cow;

use log::{error, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::response::{self, Responder};
use rocket::Request;
use serde::Serialize;

use expression::ExpressionError;
use telemetry::IsErr;

#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    UpstreamError(String),
    InternalError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::UpstreamError(e.to_string())
    }
}

impl From<ExpressionError> for ApiError {
    fn from(e: ExpressionError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl IsErr for ApiError {
    fn is_err(&self) -> bool {
        !matches!(self, ApiError::InvalidRequest(_))
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    message: Cow<'a, str>,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (message, status) = match self {
            ApiError::InternalError(e) => {
                error!("Internal Error: {}", e);
                (
                    Cow::Borrowed("Internal Server Error"),
                    Status::InternalServerError,
                )
            }
            ApiError::UpstreamError(e) => {
                warn!("Upstream Error: {}", e);
                (
                    Cow::Owned(format!("Upstream service error: {}", e)),
                    Status::BadGateway,
                )
            }
            ApiError::InvalidRequest(e) => (Cow::Owned(e), Status::BadRequest),
        };
        response::status::Custom(status, Json(ErrorResponse { message })).respond_to(req)
    }
}
