//! Response construction.
//!
//! # Design Decisions
//! - Render failures become a bare 500; detail stays in the server log

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::http::handler::PresentationRecord;
use crate::http::render::Render;

/// Body sent when the page cannot be rendered.
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Render the page for a record.
pub fn render_page(renderer: &dyn Render, record: &PresentationRecord) -> Response {
    match renderer.render(record) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(client_ip = %record.client_ip, error = %e, "Error executing template");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
        }
    }
}
