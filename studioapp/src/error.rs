use axum::{
    extract::rejection::{
        JsonRejection,
        QueryRejection,
    },
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use http::status::StatusCode;
use serde_json::json;
use studiostore::error::{
    Error as StoreError,
    GENERIC_MESSAGE,
};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("400 Bad Request")]
    BadRequest,
    #[error("401 Unauthorized")]
    Unauthorized,
    #[error("403 Forbidden")]
    Forbidden,
    #[error("404 Not Found")]
    NotFound,
    #[error("500 Internal Server Error")]
    InternalServerError,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::BadRequest => "the request could not be understood",
            AppError::Unauthorized => "please sign in to continue",
            AppError::Forbidden => "you do not have permission for this action",
            AppError::NotFound => "the record could not be found",
            AppError::InternalServerError => GENERIC_MESSAGE,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unauthenticated => AppError::Unauthorized,
            StoreError::PermissionDenied(_) => AppError::Forbidden,
            StoreError::NotFound(_) => AppError::NotFound,
            e => {
                log::error!("record store failure: {e}");
                AppError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        log::debug!("rejected request body: {e}");
        AppError::BadRequest
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        log::debug!("rejected query string: {e}");
        AppError::BadRequest
    }
}

impl From<studiorender::error::Error> for AppError {
    fn from(e: studiorender::error::Error) -> Self {
        log::error!("rendering failure: {e}");
        AppError::InternalServerError
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        log::error!("rendering task failed: {e}");
        AppError::InternalServerError
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.message() })),
        ).into_response()
    }
}

#[cfg(test)]
mod test {
    use studiocore::{
        ac::{
            permit::Operation,
            Employee,
            Role,
        },
        error::BackendError,
    };
    use studiostore::error::Denial;
    use super::*;

    #[test]
    fn store_errors() {
        let denial = Denial {
            path: "savedRecords".into(),
            operation: Operation::Create,
            payload: None,
            employee: Employee {
                id: 1,
                name: "Vic".into(),
                role: Role::Viewer,
                created_ts: 0,
            },
        };
        assert_eq!(AppError::from(StoreError::Unauthenticated).status_code(), 401);
        assert_eq!(AppError::from(StoreError::PermissionDenied(denial)).status_code(), 403);
        assert_eq!(AppError::from(StoreError::NotFound("abc".into())).status_code(), 404);
        let backend = AppError::from(StoreError::Backend(
            BackendError::AppInvariantViolation("disk on fire".into())
        ));
        assert_eq!(backend, AppError::InternalServerError);
        assert_eq!(backend.message(), "could not complete action");
    }
}
