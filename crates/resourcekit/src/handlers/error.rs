use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use resourcekit_core::filters::FilterError;
use resourcekit_core::guard::GuardRejection;
use resourcekit_core::storage::{
    filter_error_to_status_code, guard_rejection_to_status_code, repository_error_to_status_code,
    RepositoryError,
};

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(repo_error)
        } else if let Some(rejection) = self.0.downcast_ref::<GuardRejection>() {
            guard_rejection_to_status_code(rejection)
        } else if let Some(filter_error) = self.0.downcast_ref::<FilterError>() {
            filter_error_to_status_code(filter_error)
        } else if self.0.is::<QueryRejection>() {
            400
        } else if self.0.is::<serde_json::Error>() {
            422
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
            let message = status_code
                .canonical_reason()
                .unwrap_or("Internal Server Error");
            return (status_code, message).into_response();
        }

        tracing::debug!(status = %status_code, error = %self.0, "Request rejected");
        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
