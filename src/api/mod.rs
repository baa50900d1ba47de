//! # API Module
//!
//! The HTTP surface of the application. Every handler sequences the same
//! three collaborators held in [`crate::server::AppState`]: the
//! [`AuthProvider`](crate::spotify::AuthProvider) that owns the OAuth flow,
//! the [`TrackSource`](crate::spotify::TrackSource) that fetches listening
//! data, and the heatmap renderer. Outcomes are translated into a redirect,
//! a page, or the error page.
//!
//! ## Endpoints
//!
//! - [`home`] - `GET /`, sends the visitor to their tracks or to the
//!   provider's consent page
//! - [`callback`] - `GET /callback`, the OAuth redirect target
//! - [`top_tracks`] - `GET /top_tracks`, the ranked list
//! - [`heatmap`] - `GET /heatmap`, the audio feature heatmap
//! - [`health`] - `GET /health`, status and version for monitoring
//!
//! ## Session handling
//!
//! Handlers take the visitor's [`Session`](crate::management::Session)
//! explicitly. Whenever a page fails, the session token is dropped before
//! the error page goes out, so the next visit to `/` starts a fresh
//! authorization.

mod callback;
mod health;
mod home;
mod pages;

pub use callback::callback;
pub use health::health;
pub use home::home;
pub use pages::heatmap;
pub use pages::top_tracks;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

pub const HOME_PATH: &str = "/";
pub const TOP_TRACKS_PATH: &str = "/top_tracks";

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
