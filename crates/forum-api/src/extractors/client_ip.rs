//! Client address extractor
//!
//! Best-effort resolution of the client IP from proxy headers; posts record
//! it when available.

use std::convert::Infallible;
use std::net::IpAddr;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Client IP resolved from X-Forwarded-For or X-Real-IP
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        let ip = forwarded.or_else(|| {
            parts
                .headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        });

        Ok(ClientIp(ip))
    }
}
