//! Plain-HTTP to HTTPS redirect for deployments behind a TLS proxy.

use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::ApiError;
use crate::error::ValidationError;

/// Header set by the proxy to the scheme the client used.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Pass through requests the proxy marks as HTTPS, redirect the rest.
pub(super) async fn force_https(request: Request, next: Next) -> Response {
    if is_https(request.headers()) {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
    else {
        return ApiError::from(ValidationError::MissingHeader("host")).into_response();
    };
    let target = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    let location = format!("https://{}{}", host, target);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

fn is_https(headers: &HeaderMap) -> bool {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}
