#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use top_heat::{
    config::Settings,
    server::{self, AppState},
    types::{AudioFeatures, TopTracks, Track},
    utils,
};

pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESHED_TOKEN: &str = "access-2";
pub const REFRESH_TOKEN: &str = "refresh-1";

/// Serves the app on an ephemeral port and returns its base URL.
pub async fn spawn_app(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, state));
    format!("http://{}", addr)
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

pub fn location(res: &reqwest::Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `session=<id>` from the response's `Set-Cookie`, ready to send back.
pub fn session_cookie(res: &reqwest::Response) -> String {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("response should set a session cookie")
        .to_string()
}

pub fn temp_token_path() -> PathBuf {
    std::env::temp_dir().join(format!("top-heat-test-{}.json", utils::generate_id(12)))
}

pub fn features(seed: f64) -> AudioFeatures {
    AudioFeatures {
        danceability: seed,
        energy: seed + 0.1,
        valence: seed + 0.2,
        acousticness: seed - 0.3,
        instrumentalness: seed - 0.2,
        liveness: seed - 0.1,
        speechiness: seed - 0.4,
    }
}

pub fn track(id: &str, name: &str, cover: Option<&str>) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec!["Some Artist".to_string()],
        album_cover_url: cover.map(str::to_string),
    }
}

/// The two track fixture: "Song 1" and "Song 2" with covers.
pub fn two_tracks() -> TopTracks {
    TopTracks::new(
        vec![
            track("id-1", "Song 1", Some("image_url_1")),
            track("id-2", "Song 2", Some("image_url_2")),
        ],
        vec![features(0.5), features(0.6)],
    )
    .unwrap()
}

/// A stand-in for the Spotify accounts service and Web API.
#[derive(Default)]
pub struct Upstream {
    /// How many ranked tracks `/me/top/tracks` returns.
    pub tracks: usize,
    /// Answer `null` for the last track's audio features.
    pub missing_feature: bool,
    /// Leave `name` out of every ranked track.
    pub nameless: bool,
    /// How many more `/me/top/tracks` calls answer 503 before it recovers.
    pub outages: AtomicUsize,
    pub top_track_calls: AtomicUsize,
    pub feature_calls: AtomicUsize,
}

impl Upstream {
    pub fn with_tracks(tracks: usize) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn top_track_calls(&self) -> usize {
        self.top_track_calls.load(Ordering::SeqCst)
    }

    pub fn feature_calls(&self) -> usize {
        self.feature_calls.load(Ordering::SeqCst)
    }
}

/// Starts `upstream` and returns its base URL.
pub async fn spawn_upstream(upstream: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/authorize", get(|| async { "consent page" }))
        .route("/api/token", post(token_endpoint))
        .route("/v1/me/top/tracks", get(top_tracks_endpoint))
        .route("/v1/audio-features", get(audio_features_endpoint))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{}", addr)
}

/// Settings pointing every Spotify URL at `upstream`.
pub fn upstream_settings(upstream: &str) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("CLIENT_ID", "client-id".to_string()),
        ("CLIENT_SECRET", "client-secret".to_string()),
        ("REDIRECT_URI", "http://127.0.0.1:8000/callback".to_string()),
        ("SPOTIFY_AUTH_URL", format!("{upstream}/authorize")),
        ("SPOTIFY_TOKEN_URL", format!("{upstream}/api/token")),
        ("SPOTIFY_API_URL", format!("{upstream}/v1")),
        ("TOKEN_CACHE_PATH", temp_token_path().display().to_string()),
    ]);

    Settings::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = [ACCESS_TOKEN, REFRESHED_TOKEN].map(|t| format!("Bearer {t}"));
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| expected.iter().any(|e| e == v))
}

async fn token_endpoint(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !headers.contains_key(header::AUTHORIZATION) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_client"})),
        )
            .into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good") => {
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
                "refresh_token": REFRESH_TOKEN,
            }))
            .into_response()
        }
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some(REFRESH_TOKEN) => {
            Json(json!({
                "access_token": REFRESHED_TOKEN,
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        )
            .into_response(),
    }
}

async fn top_tracks_endpoint(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    upstream.top_track_calls.fetch_add(1, Ordering::SeqCst);

    let down = upstream
        .outages
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if down {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
        )
            .into_response();
    }

    if params.get("limit").map(String::as_str) != Some("10")
        || params.get("time_range").map(String::as_str) != Some("short_term")
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let items: Vec<Value> = (0..upstream.tracks)
        .map(|i| {
            let mut item = json!({
                "id": format!("track-{i}"),
                "name": format!("Song {i}"),
                "popularity": 50,
                "album": {
                    "name": format!("Album {i}"),
                    "images": [
                        {"url": format!("https://img.example/{i}.jpg"), "height": 640, "width": 640},
                        {"url": format!("https://img.example/{i}-small.jpg"), "height": 64, "width": 64},
                    ],
                },
                "artists": [{"name": format!("Artist {i}")}],
            });
            if upstream.nameless {
                item.as_object_mut().unwrap().remove("name");
            }
            item
        })
        .collect();

    Json(json!({ "items": items, "total": upstream.tracks })).into_response()
}

async fn audio_features_endpoint(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    upstream.feature_calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let ids: Vec<String> = params
        .get("ids")
        .map(|ids| ids.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    let last = ids.len().saturating_sub(1);
    let features: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            if upstream.missing_feature && i == last {
                return Value::Null;
            }
            let v = i as f64 / 10.0;
            json!({
                "id": id,
                "danceability": v,
                "energy": v,
                "valence": v,
                "acousticness": v,
                "instrumentalness": v,
                "liveness": v,
                "speechiness": v,
                "tempo": 120.0,
                "key": 5,
            })
        })
        .collect();

    Json(json!({ "audio_features": features })).into_response()
}
