// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

const ERROR_PAGE: &str =
    "<!doctype html><html><body><h1>Something went wrong</h1><p>Try again later.</p></body></html>";

/// Any failure that escapes a handler. The detail is logged, never shown.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %format!("{:#}", self.0), "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
    }
}
