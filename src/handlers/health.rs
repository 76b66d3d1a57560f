use axum::Json;

use super::transactions::MessageResponse;

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("Money Manager API is running!"),
    })
}
