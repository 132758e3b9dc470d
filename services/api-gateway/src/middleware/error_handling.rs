use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use partbin_utils::{ErrorResponse, FormatError, PartbinError};
use tracing::{error, warn};

/// Handler error rendered as an [`ErrorResponse`] body with the error's status.
#[derive(Debug)]
pub struct ApiError(pub PartbinError);

impl From<PartbinError> for ApiError {
    fn from(error: PartbinError) -> Self {
        Self(error)
    }
}

impl From<FormatError> for ApiError {
    fn from(error: FormatError) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
