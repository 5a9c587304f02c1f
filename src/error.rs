//! Translation of service failures into HTTP responses.

use gotham::handler::HandlerError;
use gotham::helpers::http::response::create_response;
use gotham::hyper::{Body, Response, StatusCode};
use gotham::state::{request_id, State};
use log::{debug, error};

use crate::service::ServiceError;

/// Turns the outcome of a service call into a handler result.
///
/// On success `respond` builds the response. `ServiceError::NotFound` becomes a `404 Not Found`
/// whose plain-text body is the error message; any other failure is handed to Gotham as a
/// `500 Internal Server Error`.
pub fn into_handler_result<T, F>(
    state: &State,
    result: Result<T, ServiceError>,
    respond: F,
) -> Result<Response<Body>, HandlerError>
where
    F: FnOnce(&State, T) -> Result<Response<Body>, HandlerError>,
{
    match result {
        Ok(value) => respond(state, value),
        Err(ServiceError::NotFound(message)) => {
            debug!("[{}] {}", request_id(state), message);
            Ok(create_response(
                state,
                StatusCode::NOT_FOUND,
                mime::TEXT_PLAIN_UTF_8,
                message,
            ))
        }
        Err(e) => {
            error!("[{}] {}", request_id(state), e);
            Err(HandlerError::from(e))
        }
    }
}

/// Wraps a malformed-request error so Gotham answers `400 Bad Request`.
pub fn bad_request<E>(e: E) -> HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HandlerError::from(e).with_status(StatusCode::BAD_REQUEST)
}
