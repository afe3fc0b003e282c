//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the route's upstream
//! - Prepare headers for the new hop
//! - Bound the wait for the upstream response head
//! - Relay the upstream response as-is
//!
//! # Design Decisions
//! - No retries; a failed upstream call surfaces immediately
//! - Connect failures map to 502, deadline expiry to 504
//! - A request body cut off by the size limit maps to 413, not to an upstream failure
//! - Bodies stream in both directions, nothing is buffered
//! - Dropping the handler future (client went away) drops the upstream call

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Version};
use axum::response::Response;
use http_body_util::LengthLimitError;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

use crate::http::error::GatewayError;
use crate::http::headers::prepare_upstream;
use crate::http::response::relay;
use crate::routing::Route;

/// Shared client used for every upstream call.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Forward `request` to `route`, using `path_and_query` as the upstream path.
pub async fn forward(
    client: &UpstreamClient,
    upstream_timeout: Duration,
    max_body_bytes: usize,
    route: &Route,
    path_and_query: &str,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let uri = route
        .upstream
        .uri_for(path_and_query)
        .map_err(|e| GatewayError::InvalidUpstreamRequest(e.to_string()))?;

    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (mut parts, body) = request.into_parts();
    prepare_upstream(&mut parts.headers, client_addr);
    parts.uri = uri;
    // Upstreams are spoken to over HTTP/1.1 whatever the inbound version.
    parts.version = Version::HTTP_11;

    tracing::debug!(
        route = %route.name,
        upstream = %parts.uri,
        method = %parts.method,
        "Forwarding request"
    );

    let upstream_request = Request::from_parts(parts, body);
    match tokio::time::timeout(upstream_timeout, client.request(upstream_request)).await {
        Ok(Ok(response)) => Ok(relay(response)),
        Ok(Err(e)) if exceeded_body_limit(&e) => {
            Err(GatewayError::PayloadTooLarge {
                limit: max_body_bytes,
            })
        }
        Ok(Err(e)) => {
            let reason = match e.source() {
                Some(source) => format!("{e}: {source}"),
                None => e.to_string(),
            };
            Err(GatewayError::UpstreamUnavailable {
                route: route.name.clone(),
                reason,
            })
        }
        Err(_) => Err(GatewayError::UpstreamTimeout {
            route: route.name.clone(),
            timeout: upstream_timeout,
        }),
    }
}

/// True when the client's body stream was cut off by the body limit.
fn exceeded_body_limit(err: &(dyn Error + 'static)) -> bool {
    std::iter::successors(Some(err), |e: &&(dyn Error + 'static)| (*e).source()).any(|e| e.is::<LengthLimitError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full, Limited};

    #[tokio::test]
    async fn detects_length_limit_in_error_chain() {
        let limited = Limited::new(Full::new(hyper::body::Bytes::from_static(&[0u8; 64])), 16);
        let err = Body::new(limited).collect().await.unwrap_err();
        assert!(exceeded_body_limit(&err));
    }

    #[test]
    fn other_errors_are_not_length_limits() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(!exceeded_body_limit(&err));
    }
}
