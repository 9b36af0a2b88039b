// src/routes/mod.rs

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorEnvelope;

pub mod api;
pub mod health;
pub mod pages;

pub type ApiError = (StatusCode, Json<ErrorEnvelope>);

pub const FETCH_FAILED: &str = "Failed to retrieve commission data";

// Common error mapper
pub fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorEnvelope::new(e.to_string())))
}

/// Turns a panic inside an API handler into the usual error envelope.
pub fn panic_envelope(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected error".to_string()
    };
    tracing::error!(%message, "request handler panicked");
    internal_error(message).into_response()
}
