use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::{
    api::{HOME_PATH, TOP_TRACKS_PATH, found},
    errors::AuthError,
    management::Session,
    server::AppState,
    success, warning,
};

/// OAuth redirect target.
///
/// An `error` parameter means the user declined consent and wins over
/// anything else in the query. Without a `code` there is nothing to
/// exchange. Both cases, and a failed exchange, go back home without
/// touching the session.
pub async fn callback(
    State(state): State<AppState>,
    mut session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(reason) = params.get("error") {
        warning!("{}", AuthError::Cancelled(reason.clone()));
        return found(HOME_PATH);
    }

    let Some(code) = params.get("code") else {
        warning!("{}", AuthError::MissingCode);
        return found(HOME_PATH);
    };

    match state.auth.exchange_code(code).await {
        Ok(token) => {
            if let Err(e) = state.token_cache.persist(&token).await {
                warning!(
                    "Failed to save token to {}: {}",
                    state.token_cache.path().display(),
                    e
                );
            }
            session.store_token(token).await;

            success!("Authentication successful!");
            found(TOP_TRACKS_PATH)
        }
        Err(e) => {
            warning!("{}", e);
            found(HOME_PATH)
        }
    }
}
