/// Same-origin audio relay
///
/// Streams an upstream audio file back to the player unchanged. Range requests are
/// forwarded so seeking works against hosts that support them.
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    #[serde(default)]
    pub url: Option<String>,
}

/// Relay failures, answered as plain text
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Audio URL not provided")]
    MissingUrl,

    #[error("Audio URL must be an absolute http(s) URL")]
    InvalidUrl,

    #[error("Failed to fetch audio from the origin server")]
    Upstream(StatusCode),

    #[error("Proxy server error")]
    Fetch(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::MissingUrl | ProxyError::InvalidUrl => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(status) => *status,
            ProxyError::Fetch(e) => {
                tracing::error!("Relay fetch failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// GET /api/proxy?url=<encoded upstream locator>
pub async fn proxy_audio(
    State(app_state): State<AppState>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let target = query
        .url
        .filter(|url| !url.is_empty())
        .ok_or(ProxyError::MissingUrl)?;

    let target = url::Url::parse(&target).map_err(|_| ProxyError::InvalidUrl)?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(ProxyError::InvalidUrl);
    }

    let mut request = app_state
        .http
        .get(target.clone())
        .header(reqwest::header::USER_AGENT, &app_state.config.upstream.user_agent);
    if let Some(range) = headers.get(header::RANGE).and_then(|r| r.to_str().ok()) {
        tracing::debug!(range, "Forwarding range request");
        request = request.header(reqwest::header::RANGE, range);
    }

    let upstream = request.send().await?;

    // reqwest and axum sit on different `http` majors; convert through primitives
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        tracing::warn!(url = %target, %status, "Upstream refused audio request");
        return Err(ProxyError::Upstream(status));
    }

    let mut relayed = HeaderMap::new();
    for name in relayed_headers() {
        if let Some(value) = upstream
            .headers()
            .get(name.as_str())
            .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        {
            relayed.insert(name, value);
        }
    }
    relayed
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    tracing::debug!(url = %target, %status, "Relaying audio");

    let body = Body::from_stream(upstream.bytes_stream());
    Ok((status, relayed, body).into_response())
}

/// Upstream headers relayed to the player
fn relayed_headers() -> [HeaderName; 4] {
    [
        header::CONTENT_TYPE,
        header::CONTENT_LENGTH,
        header::CONTENT_RANGE,
        header::ACCEPT_RANGES,
    ]
}
