//! Request tracking middleware
//!
//! Every request gets a `req_`-prefixed TypeID in `x-request-id` unless the
//! client already sent one, and the id is echoed back on the response.
//! Credential-bearing headers are marked sensitive so `TraceLayer` never
//! prints their values.

use http::{header, HeaderName};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::ids::MakeTypedRequestId;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers whose values are redacted from logs
pub fn sensitive_headers() -> Vec<HeaderName> {
    vec![
        header::AUTHORIZATION,
        header::COOKIE,
        header::SET_COOKIE,
        HeaderName::from_static("x-api-key"),
        HeaderName::from_static("x-auth-token"),
    ]
}

pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(sensitive_headers())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_headers() {
        let headers = sensitive_headers();
        assert!(headers.contains(&header::AUTHORIZATION));
        assert!(headers.contains(&HeaderName::from_static("x-api-key")));
    }
}
