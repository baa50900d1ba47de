use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Settings,
    errors::{FetchError, with_causes},
    spotify::TrackSource,
    types::{
        ApiTrack, AudioFeatures, AudioFeaturesResponse, Paging, TOP_TRACKS_LIMIT, TopTracks, Token,
        Track,
    },
    warning,
};

const TIME_RANGE: &str = "short_term";

/// Top tracks and audio features from the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyTracks {
    client: Client,
    api_url: String,
    retries: u32,
}

impl SpotifyTracks {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_url: settings.api_url.clone(),
            retries: settings.fetch_retries,
        }
    }

    /// Retrieves the ten highest ranked tracks of the short term window.
    ///
    /// # Errors
    ///
    /// - `FetchError::InsufficientHistory` when fewer than ten tracks are
    ///   ranked
    /// - `FetchError::Http` on network or status failures
    /// - `FetchError::Parse` when the body is not the expected shape
    pub async fn top_tracks(&self, token: &Token) -> Result<Vec<ApiTrack>, FetchError> {
        let limit = TOP_TRACKS_LIMIT.to_string();
        let url = format!("{uri}/me/top/tracks", uri = self.api_url);
        let mut page: Paging<ApiTrack> = self
            .get_json(
                &url,
                &[("limit", limit.as_str()), ("time_range", TIME_RANGE)],
                token,
            )
            .await?;

        if page.items.len() < TOP_TRACKS_LIMIT {
            return Err(FetchError::InsufficientHistory {
                found: page.items.len(),
            });
        }

        page.items.truncate(TOP_TRACKS_LIMIT);
        Ok(page.items)
    }

    /// Retrieves audio features for `ids`, in the same order.
    ///
    /// Spotify answers `null` for tracks it has no analysis for; that is
    /// reported as an upstream error since the heatmap needs every column.
    pub async fn audio_features(
        &self,
        ids: &[&str],
        token: &Token,
    ) -> Result<Vec<Option<AudioFeatures>>, FetchError> {
        let url = format!("{uri}/audio-features", uri = self.api_url);
        let joined = ids.join(",");
        let res: AudioFeaturesResponse = self
            .get_json(&url, &[("ids", joined.as_str())], token)
            .await?;

        if res.audio_features.len() != ids.len() {
            return Err(FetchError::Upstream(format!(
                "requested audio features for {} tracks, got {}",
                ids.len(),
                res.audio_features.len()
            )));
        }

        Ok(res.audio_features)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &Token,
    ) -> Result<T, FetchError> {
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .get(url)
                .query(query)
                .bearer_auth(&token.access_token)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());

            match response {
                Ok(valid_response) => {
                    let body = valid_response.bytes().await?;
                    return Ok(serde_json::from_slice(&body)?);
                }
                Err(err) if attempt < self.retries && is_transient(&err) => {
                    attempt += 1;
                    warning!(
                        "Request to {} failed ({}), retry {}/{}",
                        url,
                        with_causes(&err),
                        attempt,
                        self.retries
                    );
                    sleep(Duration::from_millis(500 * attempt as u64)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_connect() || err.is_timeout() {
        return true;
    }

    matches!(
        err.status(),
        Some(StatusCode::TOO_MANY_REQUESTS)
            | Some(StatusCode::BAD_GATEWAY)
            | Some(StatusCode::SERVICE_UNAVAILABLE)
    )
}

#[async_trait]
impl TrackSource for SpotifyTracks {
    async fn fetch_top_tracks(&self, token: &Token) -> Result<TopTracks, FetchError> {
        let ranked = self.top_tracks(token).await?;
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        let features = self.audio_features(&ids, token).await?;

        let features = ranked
            .iter()
            .zip(features)
            .map(|(track, f)| {
                f.ok_or_else(|| {
                    FetchError::Upstream(format!("no audio features for track {}", track.id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tracks = ranked.into_iter().map(Track::from).collect();
        TopTracks::new(tracks, features)
    }
}
