use crate::error::CheckError;
use crate::models::{CheckInput, CheckRequest};
use crate::startup::AppState;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};

pub const RESULT_SOURCE_HEADER: &str = "x-result-source";

const TEXT_FIELD: &str = "text";
const FILE_FIELD: &str = "file";

/// `POST /api/check`: accepts multipart (`text`, `file`), JSON or urlencoded
/// bodies and returns `{similarity, flaggedSections}`.
pub async fn check_plagiarism(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, CheckError> {
    let (text, file_name) = read_fields(request, &state).await?;
    let input = CheckInput::resolve(text, file_name).ok_or(CheckError::InvalidInput)?;
    let payload = input.payload();
    let kind = match input {
        CheckInput::Text(_) => "text",
        CheckInput::File { .. } => "file",
    };

    tracing::info!(
        kind = kind,
        payload_len = payload.len(),
        "Plagiarism check requested"
    );

    let outcome = state.checker.check(&payload).await?;

    tracing::info!(
        source = %outcome.source,
        similarity = outcome.result.similarity,
        flagged = outcome.result.flagged_sections.len(),
        "Plagiarism check completed"
    );

    let mut response = (StatusCode::OK, Json(outcome.result)).into_response();
    response.headers_mut().insert(
        RESULT_SOURCE_HEADER,
        HeaderValue::from_static(outcome.source.as_str()),
    );
    Ok(response)
}

/// Pull the optional `text` field and uploaded file name out of the body.
async fn read_fields(
    request: Request,
    state: &AppState,
) -> Result<(Option<String>, Option<String>), CheckError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| CheckError::MalformedBody(e.body_text()))?;
        return read_multipart(multipart).await;
    }

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<CheckRequest>::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), e.body_text()))?;
        return Ok((body.text, None));
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<CheckRequest>::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), e.body_text()))?;
        return Ok((body.text, None));
    }

    Ok((None, None))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<String>), CheckError> {
    let mut text = None;
    let mut file_name = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some(FILE_FIELD) => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty());
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                // Content is not analysed, but the field is still drained so
                // the body limit applies to it.
                let size = field.bytes().await.map_err(multipart_error)?.len();

                if let Some(original_name) = original_name {
                    tracing::debug!(
                        filename = %original_name,
                        mime_type = %mime_type,
                        size = size,
                        "Received file upload"
                    );
                    file_name = Some(original_name);
                }
            }
            Some(TEXT_FIELD) => {
                text = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok((text, file_name))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> CheckError {
    body_error(err.status(), err.body_text())
}

/// Extractor rejections: over the body limit is 413, anything else 400.
fn body_error(status: StatusCode, detail: String) -> CheckError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CheckError::PayloadTooLarge
    } else {
        CheckError::MalformedBody(detail)
    }
}
