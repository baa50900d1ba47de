use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    Res, api,
    config::Settings,
    info,
    management::{SessionStore, TokenCache, session_cookie},
    spotify::{AuthProvider, SpotifyAuth, SpotifyTracks, TrackSource},
    warning,
};

/// Shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub tracks: Arc<dyn TrackSource>,
    pub sessions: SessionStore,
    pub token_cache: TokenCache,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        tracks: Arc<dyn TrackSource>,
        token_cache: TokenCache,
    ) -> Self {
        Self {
            auth,
            tracks,
            sessions: SessionStore::new(),
            token_cache,
        }
    }

    /// State backed by the real Spotify services.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = Client::new();
        Self::new(
            Arc::new(SpotifyAuth::new(client.clone(), settings)),
            Arc::new(SpotifyTracks::new(client, settings)),
            TokenCache::new(settings.token_cache_path.clone()),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/callback", get(api::callback))
        .route("/top_tracks", get(api::top_tracks))
        .route("/heatmap", get(api::heatmap))
        .route("/health", get(api::health))
        .layer(middleware::from_fn_with_state(state.clone(), session_cookie))
        .with_state(state)
}

/// Serves the app on `listener` until the process ends.
pub async fn serve(listener: TcpListener, state: AppState) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn start_api_server(settings: Settings, open_browser: bool) -> Res<()> {
    let listener = TcpListener::bind(settings.server_addr).await?;
    let url = format!("http://{}/", listener.local_addr()?);
    info!("Listening on {}", url);

    if open_browser && webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }

    serve(listener, AppState::from_settings(&settings)).await
}
