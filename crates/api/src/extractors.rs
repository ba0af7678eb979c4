//! Request extractors.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequest, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use tasknote_common::AppError;
use tasknote_db::Caller;

use crate::middleware::AppState;

/// Authenticated caller extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Caller);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// JSON body whose rejections render like every other API error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Where a request came from, for login history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client address, if it could be determined.
    pub ip: Option<IpAddr>,
    pub user_agent: String,
}

impl ClientInfo {
    /// Read the client address and user agent. Proxy headers are only
    /// consulted when `trust_proxy` is set; otherwise the socket peer wins.
    fn from_parts(parts: &Parts, trust_proxy: bool) -> Self {
        let socket = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let forwarded = if trust_proxy {
            forwarded_ip(&parts.headers)
        } else {
            None
        };

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .chars()
            .take(255)
            .collect();

        Self {
            ip: forwarded.or(socket),
            user_agent,
        }
    }
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.trust_proxy))
    }
}

/// First parseable address from `X-Forwarded-For`, then `X-Real-IP`.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_ip_prefers_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers), "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_forwarded_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));
        assert_eq!(forwarded_ip(&headers), "2001:db8::1".parse().ok());

        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }

    fn request_parts(forwarded_for: &str) -> Parts {
        let peer: SocketAddr = "198.51.100.4:5000".parse().unwrap();
        let (mut parts, ()) = axum::http::Request::builder()
            .header("x-forwarded-for", forwarded_for)
            .header(header::USER_AGENT, "curl/8.0")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(ConnectInfo(peer));
        parts
    }

    #[test]
    fn test_client_info_ignores_proxy_headers_by_default() {
        let parts = request_parts("203.0.113.7");

        let info = ClientInfo::from_parts(&parts, false);
        assert_eq!(info.ip, "198.51.100.4".parse().ok());
        assert_eq!(info.user_agent, "curl/8.0");
    }

    #[test]
    fn test_client_info_trusts_configured_proxy() {
        let parts = request_parts("203.0.113.7");

        let info = ClientInfo::from_parts(&parts, true);
        assert_eq!(info.ip, "203.0.113.7".parse().ok());
    }
}
