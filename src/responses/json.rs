use crate::errors::AppError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

pub fn json_response(body: String) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| AppError::InternalError)
}
