//! Client metadata recorded with new sessions

use axum::http::{header, HeaderMap};
use launchpad_core::models::SessionMetadata;
use std::net::IpAddr;

const MAX_USER_AGENT_LEN: usize = 512;

/// Client IP from `X-Forwarded-For` (left-most valid entry) or `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|chain| {
            chain
                .split(',')
                .map(str::trim)
                .find(|candidate| candidate.parse::<IpAddr>().is_ok())
        });

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|candidate| candidate.parse::<IpAddr>().is_ok())
    };

    forwarded.or_else(real_ip).map(str::to_string)
}

pub fn session_metadata(headers: &HeaderMap) -> SessionMetadata {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect());

    SessionMetadata {
        ip_address: client_ip(headers),
        user_agent,
    }
}
