use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

/// Number of ranked tracks a listening history must yield.
pub const TOP_TRACKS_LIMIT: usize = 10;

/// Seconds before `expires_at` from which a token counts as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Delegated access to the Spotify Web API for one user.
///
/// Everything except `access_token` is optional on the wire; the token
/// endpoint omits `refresh_token` on refresh and test doubles usually only
/// hand out an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: i64,
}

impl Token {
    /// A bearer token with nothing but an access token. Mostly useful for
    /// tests and provider doubles.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            scope: String::new(),
            expires_in: 0,
            expires_at: 0,
        }
    }

    /// Fixes the absolute expiry from `expires_in`, relative to `now`.
    pub fn stamped(mut self, now: i64) -> Self {
        self.expires_at = now + self.expires_in;
        self
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at - now < EXPIRY_MARGIN_SECS
    }

    /// True when every space separated scope in `requested` was granted.
    pub fn covers_scope(&self, requested: &str) -> bool {
        let granted: Vec<&str> = self.scope.split_whitespace().collect();
        requested
            .split_whitespace()
            .all(|scope| granted.contains(&scope))
    }
}

/// One ranked track, as much of it as the pages need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album_cover_url: Option<String>,
}

impl From<ApiTrack> for Track {
    fn from(track: ApiTrack) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album_cover_url: track.album.images.into_iter().next().map(|i| i.url),
        }
    }
}

/// The audio feature dimensions shown in the heatmap, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Danceability,
    Energy,
    Valence,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Danceability,
        Feature::Energy,
        Feature::Valence,
        Feature::Acousticness,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Speechiness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Feature::Danceability => "danceability",
            Feature::Energy => "energy",
            Feature::Valence => "valence",
            Feature::Acousticness => "acousticness",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Speechiness => "speechiness",
        }
    }
}

/// Provider computed descriptors of a track, each in `[0, 1]`.
///
/// The upstream record carries many more fields (tempo, key, loudness...)
/// which are ignored while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub speechiness: f64,
}

impl AudioFeatures {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Danceability => self.danceability,
            Feature::Energy => self.energy,
            Feature::Valence => self.valence,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Speechiness => self.speechiness,
        }
    }
}

/// Ranked tracks with their audio features, matched by position.
#[derive(Debug, Clone, PartialEq)]
pub struct TopTracks {
    tracks: Vec<Track>,
    features: Vec<AudioFeatures>,
}

impl TopTracks {
    pub fn new(tracks: Vec<Track>, features: Vec<AudioFeatures>) -> Result<Self, FetchError> {
        if tracks.len() != features.len() {
            return Err(FetchError::Upstream(format!(
                "got audio features for {} of {} tracks",
                features.len(),
                tracks.len()
            )));
        }

        Ok(Self { tracks, features })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn features(&self) -> &[AudioFeatures] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Track, &AudioFeatures)> {
        self.tracks.iter().zip(self.features.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    pub name: String,
    pub album: ApiAlbum,
    #[serde(default)]
    pub artists: Vec<ApiArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAlbum {
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
