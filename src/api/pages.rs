use axum::{extract::State, response::Html};

use crate::{
    errors::{AuthError, PageError},
    heatmap,
    management::Session,
    server::AppState,
    types::TopTracks,
    views, warning,
};

/// Validates the session token and fetches the ranked tracks with it.
///
/// A refreshed token replaces the one in the session.
async fn load_top_tracks(
    state: &AppState,
    session: &mut Session,
) -> Result<TopTracks, PageError> {
    let token = session.token().cloned().ok_or(AuthError::TokenMissing)?;
    let token = state
        .auth
        .validate(&token)
        .await
        .ok_or(AuthError::TokenInvalid)?;

    session.store_token(token.clone()).await;
    Ok(state.tracks.fetch_top_tracks(&token).await?)
}

/// Drops the session token and renders `err` on the error page.
async fn fail(session: &mut Session, err: PageError) -> Html<String> {
    warning!("Page request failed: {}", err);
    session.clear().await;
    Html(views::error_page(&err.to_string()))
}

pub async fn top_tracks(State(state): State<AppState>, mut session: Session) -> Html<String> {
    match load_top_tracks(&state, &mut session).await {
        Ok(result) => Html(views::top_tracks_page(&result)),
        Err(e) => fail(&mut session, e).await,
    }
}

pub async fn heatmap(State(state): State<AppState>, mut session: Session) -> Html<String> {
    let result = match load_top_tracks(&state, &mut session).await {
        Ok(result) => result,
        Err(e) => return fail(&mut session, e).await,
    };

    match heatmap::render(&result) {
        Ok(markup) => {
            let covers: Vec<&str> = result
                .tracks()
                .iter()
                .filter_map(|t| t.album_cover_url.as_deref())
                .collect();
            Html(views::heatmap_page(&markup, &covers))
        }
        Err(e) => fail(&mut session, e.into()).await,
    }
}
