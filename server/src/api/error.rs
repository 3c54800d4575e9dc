//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::IntoResponse,
    Json,
};
use survey_common::error::SurveyError;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub SurveyError);

impl From<SurveyError> for AppError {
    fn from(err: SurveyError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SurveyError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SurveyError::validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        // 外部には external_message() のみ返し、詳細はログに残す
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        (status, Json(self.0.to_error_response())).into_response()
    }
}
