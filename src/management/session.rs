use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;

use crate::{server::AppState, types::Token, utils};

pub const SESSION_COOKIE: &str = "session";

/// Tokens by session id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    tokens: Arc<Mutex<HashMap<String, Token>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Token> {
        self.tokens.lock().await.get(id).cloned()
    }

    pub async fn insert(&self, id: &str, token: Token) {
        self.tokens.lock().await.insert(id.to_string(), token);
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.tokens.lock().await.contains_key(id)
    }

    pub async fn remove(&self, id: &str) -> Option<Token> {
        self.tokens.lock().await.remove(id)
    }
}

/// Session id attached to the request by [`session_cookie`].
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Makes sure every request has a session id, issuing the cookie for new
/// visitors.
///
/// A presented id is only kept while it holds a token. Unknown ids are
/// swapped for a fresh one, so a login never lands on an id the client
/// picked.
pub async fn session_cookie(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = req
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookies| utils::cookie_value(cookies, SESSION_COOKIE))
        .map(str::to_owned);

    let (id, fresh) = match existing {
        Some(id) if state.sessions.contains(&id).await => (id, false),
        _ => (utils::generate_session_id(), true),
    };

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut res = next.run(req).await;

    if fresh {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    res
}

/// The current visitor's session, handed to every page handler.
///
/// Carries the token as it was when the request came in. Changes go
/// straight through to the store.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    token: Option<Token>,
    store: SessionStore,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub async fn store_token(&mut self, token: Token) {
        self.store.insert(&self.id, token.clone()).await;
        self.token = Some(token);
    }

    pub async fn clear(&mut self) {
        self.store.remove(&self.id).await;
        self.token = None;
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionId(id) = parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let token = state.sessions.get(&id).await;
        Ok(Session {
            id,
            token,
            store: state.sessions.clone(),
        })
    }
}
