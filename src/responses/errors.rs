use crate::errors::ServerError;
use crate::responses::{html_response_with_status, redirect};
use crate::templates::error_page;
use astra::{Body, Response};

/// Convert a ServerError into a proper HTML response.
///
/// Missing or expired sessions go back to the login page instead of an
/// error screen.
pub fn error_to_response(err: ServerError) -> Response {
    match &err {
        ServerError::Unauthorized(_) => {
            tracing::debug!(error = %err, "redirecting to login");
        }
        ServerError::NotFound | ServerError::BadRequest(_) | ServerError::Forbidden(_) => {
            tracing::info!(error = %err, "request rejected");
        }
        _ => tracing::error!(error = %err, "request failed"),
    }

    let result = match err {
        ServerError::Unauthorized(_) => redirect("/login"),
        ServerError::NotFound => render_error(404, "Not Found"),
        ServerError::BadRequest(msg) => render_error(400, &msg),
        ServerError::Forbidden(msg) => render_error(403, &msg),
        ServerError::Upstream(_) => render_error(502, "An external service failed. Please try again."),
        ServerError::DbError(_) => render_error(500, "Database Error"),
        ServerError::XlsxError(_) => render_error(500, "Spreadsheet Error"),
        ServerError::InternalError => render_error(500, "Internal Server Error"),
    };

    result.unwrap_or_else(|_| {
        let mut resp = Response::new(Body::from("Internal Server Error"));
        *resp.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}

fn render_error(status: u16, message: &str) -> Result<Response, ServerError> {
    html_response_with_status(status, error_page(status, message))
}
