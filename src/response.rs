use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::db::dao::Page;
use crate::error::{AppError, FieldError};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Page metadata returned next to list data. `total` is the page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u64,
    pub total: u64,
    pub count: u64,
    pub total_items: u64,
}

impl Pagination {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            current: page.page,
            total: page.page_count(),
            count: page.items.len() as u64,
            total_items: page.total_items,
        }
    }
}

/// The `{ success, message?, data?, pagination?, errors? }` envelope every
/// JSON endpoint answers with.
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl<T: Serialize> JsonApiResponse<T> {
    fn success(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            success: true,
            message: None,
            data,
            pagination: None,
            errors: Vec::new(),
        }
    }

    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self::success(StatusCode::OK, Some(data)))
    }

    pub fn created(data: T) -> ApiResult<T> {
        Ok(Self::success(StatusCode::CREATED, Some(data)))
    }

    pub fn paginated(data: T, pagination: Pagination) -> ApiResult<T> {
        let mut response = Self::success(StatusCode::OK, Some(data));
        response.pagination = Some(pagination);
        Ok(response)
    }
}

impl JsonApiResponse<()> {
    pub fn message(message: impl Into<String>) -> ApiResult<()> {
        let mut response = Self::success(StatusCode::OK, None);
        response.message = Some(message.into());
        Ok(response)
    }

    pub(crate) fn from_error(err: &AppError) -> Self {
        Self {
            status: status_for(err),
            success: false,
            message: Some(err.message().to_string()),
            data: None,
            pagination: None,
            errors: err.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        } else {
            tracing::debug!(status = %status, message = %self.message(), "request rejected");
        }
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(status = %status, message = %err.message(), "request failed");
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::{body, http::StatusCode, response::IntoResponse};

    use super::{JsonApiResponse, Pagination};
    use crate::db::dao::Page;
    use crate::error::AppError;

    fn page(len: usize, page: u64, limit: u64, total_items: u64) -> Page<u8> {
        Page {
            items: vec![0; len],
            page,
            limit,
            total_items,
        }
    }

    #[test]
    fn pagination_rounds_page_count_up() {
        assert_eq!(
            Pagination::from_page(&page(1, 2, 1, 3)),
            Pagination {
                current: 2,
                total: 3,
                count: 1,
                total_items: 3
            }
        );
        assert_eq!(Pagination::from_page(&page(3, 1, 10, 23)).total, 3);
        assert_eq!(Pagination::from_page(&page(0, 1, 10, 0)).total, 0);
    }

    #[tokio::test]
    async fn validation_error_renders_field_list() {
        let response =
            AppError::invalid_field("designation", "Designation is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "designation");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn message_response_omits_data() {
        let response = JsonApiResponse::message("Packaging deleted successfully")
            .expect("message response")
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Packaging deleted successfully" })
        );
    }
}
