use axum::{extract::OriginalUri, http::Method};
use log::info;

use crate::model::error::ApiError;

pub async fn handler_404(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    info!("no route for {} {}", method, uri);
    ApiError::PathNotFound(uri.path().to_string())
}
