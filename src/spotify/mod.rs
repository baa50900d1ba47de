//! # Spotify Integration Module
//!
//! The two upstream seams of the application live here:
//!
//! - [`AuthProvider`] drives the OAuth 2.0 authorization code flow against
//!   the Spotify accounts service: building the authorize URL, exchanging
//!   the callback code and keeping a cached token usable.
//! - [`TrackSource`] fetches the user's ranked short term tracks and their
//!   audio features with a valid token.
//!
//! [`auth::SpotifyAuth`] and [`tracks::SpotifyTracks`] are the HTTP backed
//! implementations. The route handlers only ever see the traits, so tests
//! can swap either side for a double.
//!
//! ```text
//! Route handlers
//!      ↓
//! AuthProvider ── POST /api/token (code, refresh_token)
//! TrackSource  ── GET  /me/top/tracks, GET /audio-features
//!      ↓
//! reqwest
//! ```
//!
//! No call here retries unless `FETCH_RETRIES` asks for it; a failed request
//! is handed back to the caller, which decides whether the user has to
//! authorize again.

use async_trait::async_trait;

use crate::{
    errors::{AuthError, FetchError},
    types::{TopTracks, Token},
};

pub mod auth;
pub mod tracks;

pub use auth::SpotifyAuth;
pub use tracks::SpotifyTracks;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// URL the user has to visit to grant access.
    fn authorize_url(&self) -> String;

    /// Trades an authorization code from the callback for a token.
    async fn exchange_code(&self, code: &str) -> Result<Token, AuthError>;

    /// Returns a usable version of `token`, refreshing it when needed, or
    /// `None` when the user has to authorize again.
    async fn validate(&self, token: &Token) -> Option<Token>;
}

#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Ranked short term tracks with their audio features.
    async fn fetch_top_tracks(&self, token: &Token) -> Result<TopTracks, FetchError>;
}
