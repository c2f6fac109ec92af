//! Requester IP extraction

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Address of the client that sent the request
///
/// `None` when the server was started without connection info and no
/// trusted forwarding header is present. The services decide what that
/// means, so extraction itself never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterIp(pub Option<String>);

impl RequesterIp {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for RequesterIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.trust_forwarded_for {
            if let Some(ip) = forwarded_ip(&parts.headers) {
                debug!(ip = %ip, "Requester IP from X-Forwarded-For");
                return Ok(RequesterIp(Some(ip.to_string())));
            }
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_canonical().to_string());

        Ok(RequesterIp(ip))
    }
}

/// First hop of `X-Forwarded-For`, if it is an address
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let value = headers.get(FORWARDED_FOR)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    first.parse::<IpAddr>().ok().map(|ip| ip.to_canonical())
}
