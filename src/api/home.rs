use axum::{extract::State, response::Response};

use crate::{
    api::{TOP_TRACKS_PATH, found},
    management::Session,
    server::AppState,
};

/// Entry point. A visitor with a usable token goes straight to their
/// tracks, everyone else is sent to the provider to grant access.
pub async fn home(State(state): State<AppState>, mut session: Session) -> Response {
    let cached = session.token().cloned();

    if let Some(token) = cached {
        if let Some(valid) = state.auth.validate(&token).await {
            session.store_token(valid).await;
            return found(TOP_TRACKS_PATH);
        }
        session.clear().await;
    }

    found(&state.auth.authorize_url())
}
