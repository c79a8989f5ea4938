use crate::errors::AppError;
use crate::templates::error_page;
use astra::{Body, Response, ResponseBuilder};
use tracing::error;

pub type ResultResp = Result<Response, AppError>;

/// Renders any error as an HTML page with a matching status.
pub fn html_error_response(err: AppError) -> Response {
    let status = err.status_code();
    if status >= 500 {
        error!(error = %err, status, "request failed");
    }

    let body = error_page(status, &err.to_string()).into_string();
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
