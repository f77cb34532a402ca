//! Client identity extractor.
//!
//! Gathers the header-borne identity candidates; the body candidate is added
//! by the handler once the JSON body is parsed.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use chatgate_core::proxy::identity::IdentityHints;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Identity hints taken from request headers.
#[derive(Debug, Clone, Default)]
pub struct ClientIdentity(pub IdentityHints);

impl<S: Send + Sync> FromRequestParts<S> for ClientIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl ClientIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self(IdentityHints {
            header: header(CLIENT_ID_HEADER),
            body: None,
            forwarded_for: header(FORWARDED_FOR_HEADER),
            real_ip: header(REAL_IP_HEADER),
        })
    }
}
