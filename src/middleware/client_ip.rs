use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Voter identity used when the client address cannot be determined.
pub const FALLBACK_VOTER: &str = "local";

/// Proxy headers checked in order; the first one holding a valid IP wins.
const IP_HEADERS: &[&str] = &[
    "x-client-ip",
    "x-forwarded-for",
    "cf-connecting-ip",
    "fly-client-ip",
    "do-connecting-ip",
    "fastly-client-ip",
    "true-client-ip",
    "x-real-ip",
    "x-cluster-client-ip",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
];

/// The requesting client's address as a voter identity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterIp(pub String);

impl VoterIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_ip(candidate: &str) -> Option<IpAddr> {
    let candidate = candidate.trim().trim_matches('"');
    if let Ok(ip) = candidate.parse::<IpAddr>() {
        return Some(ip);
    }
    // `[v6]:port` or `v4:port`
    candidate.parse::<SocketAddr>().ok().map(|addr| addr.ip())
}

/// Pull the `for=` value out of an RFC 7239 `Forwarded` element.
fn forwarded_for(value: &str) -> Option<&str> {
    value.split(';').find_map(|pair| {
        let (key, val) = pair.split_once('=')?;
        key.trim().eq_ignore_ascii_case("for").then_some(val)
    })
}

fn ip_from_header(name: &str, value: &str) -> Option<IpAddr> {
    value.split(',').find_map(|part| {
        let part = if name == "forwarded" {
            forwarded_for(part)?
        } else {
            part
        };
        parse_ip(part)
    })
}

pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    IP_HEADERS.iter().find_map(|name| {
        let value = headers.get(*name)?.to_str().ok()?;
        ip_from_header(name, value)
    })
}

impl<S> FromRequestParts<S> for VoterIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = client_ip_from_headers(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        });

        Ok(VoterIp(
            ip.map(|ip| ip.to_string())
                .unwrap_or_else(|| FALLBACK_VOTER.to_string()),
        ))
    }
}
