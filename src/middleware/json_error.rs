use axum::{
    body::to_bytes,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    response::{JsonApiResponse, log_app_error},
};

/// Extractor rejections are short plain-text bodies; anything longer is cut.
const REJECTION_BODY_LIMIT: usize = 16 * 1024;

/// Turns axum's plain-text rejections into the `{success:false, message}`
/// envelope. Handler errors already render as JSON and pass through.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if status.is_success() || status.is_redirection() || has_json_body(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = to_bytes(body, REJECTION_BODY_LIMIT)
        .await
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .filter(|text| !text.is_empty());

    let status = envelope_status(status);
    let error = rejection_error(status, detail);
    if status.is_server_error() {
        log_app_error(&error, status);
    }

    let mut rewritten = JsonApiResponse::from_error(&error).into_response();
    *rewritten.status_mut() = status;
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}

fn has_json_body(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            let value = value.to_ascii_lowercase();
            value.starts_with("application/json") || value.contains("+json")
        })
}

// A body that parses but does not fit the request type is a bad request.
fn envelope_status(status: StatusCode) -> StatusCode {
    match status {
        StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
        other => other,
    }
}

fn rejection_error(status: StatusCode, detail: Option<String>) -> AppError {
    match status {
        StatusCode::NOT_FOUND => AppError::not_found("Route not found"),
        StatusCode::METHOD_NOT_ALLOWED => AppError::bad_request("Method not allowed"),
        StatusCode::UNAUTHORIZED => {
            AppError::unauthorized(detail.unwrap_or_else(|| "Unauthorized".to_string()))
        }
        StatusCode::FORBIDDEN => {
            AppError::forbidden(detail.unwrap_or_else(|| "Forbidden".to_string()))
        }
        _ if status.is_client_error() => AppError::bad_request(
            detail.unwrap_or_else(|| "Invalid request".to_string()),
        ),
        _ => AppError::internal(crate::error::SERVER_ERROR),
    }
}
