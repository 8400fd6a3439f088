/// Catalog API
///
/// Reshapes the upstream publication listing into the track descriptors the player
/// consumes.
use crate::{
    config::UpstreamSettings,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One catalog entry as served to the player
///
/// `file` and `trackImage` are passed through untouched so extra upstream fields
/// (stream URL, checksum, timestamps) survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicLink {
    pub title: String,
    pub file: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_image: Option<Value>,
}

/// GET /api/musics
pub async fn list_musics(State(app_state): State<AppState>) -> Result<Json<Vec<MusicLink>>> {
    let upstream = &app_state.config.upstream;

    let response = app_state
        .http
        .get(&upstream.catalog_url)
        .header(USER_AGENT, &upstream.user_agent)
        .timeout(Duration::from_secs(upstream.catalog_timeout_secs))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ServerError::Catalog(format!(
            "upstream answered {status}"
        )));
    }

    let body: Value = response.json().await?;
    let links = extract_links(&body, upstream)?;

    tracing::info!(tracks = links.len(), "Served catalog");
    Ok(Json(links))
}

/// Pull `files.<language>.<format>` out of an upstream listing
///
/// Entries without a title or file are skipped.
pub fn extract_links(body: &Value, upstream: &UpstreamSettings) -> Result<Vec<MusicLink>> {
    let entries = body
        .get("files")
        .and_then(|files| files.get(&upstream.language))
        .and_then(|language| language.get(&upstream.format))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ServerError::Catalog(format!(
                "files.{}.{} is missing or not an array",
                upstream.language, upstream.format
            ))
        })?;

    let links = entries
        .iter()
        .filter_map(|entry| match MusicLink::deserialize(entry) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed upstream entry");
                None
            }
        })
        .collect();

    Ok(links)
}
