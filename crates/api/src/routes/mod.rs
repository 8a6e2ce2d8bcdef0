use axum::http::StatusCode;

pub mod answers;
pub mod forms;
pub mod questions;
pub mod templates;
pub mod users;

pub async fn health() -> StatusCode {
    StatusCode::OK
}
