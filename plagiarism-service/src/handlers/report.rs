use crate::models::CheckResult;
use crate::services::report::{render_report, REPORT_FILE_NAME};
use axum::{http::header, response::IntoResponse, Json};

/// `POST /api/report`: render a check result as a downloadable text file.
pub async fn download_report(Json(result): Json<CheckResult>) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", REPORT_FILE_NAME);

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_report(&result),
    )
}
