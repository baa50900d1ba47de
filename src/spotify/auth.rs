use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, Url};

use crate::{
    config::Settings,
    errors::AuthError,
    spotify::AuthProvider,
    types::{Token, TokenErrorResponse},
    warning,
};

/// Authorization code flow against the Spotify accounts service.
///
/// The client secret is sent as HTTP Basic credentials on every call to the
/// token endpoint, so this flow is only suitable for a server side app.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: Url,
    token_url: Url,
}

impl SpotifyAuth {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
            auth_url: settings.auth_url.clone(),
            token_url: settings.token_url.clone(),
        }
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify may or may not rotate the refresh token; when the response
    /// carries none, the caller keeps the old one.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, AuthError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, AuthError> {
        let res = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        if !res.status().is_success() {
            return Err(AuthError::Exchange(describe_failure(res).await));
        }

        let token: Token = res
            .json()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        Ok(token.stamped(Utc::now().timestamp()))
    }
}

async fn describe_failure(res: Response) -> String {
    let status = res.status();
    match res.json::<TokenErrorResponse>().await {
        Ok(body) => body.error_description.unwrap_or(body.error),
        Err(_) => format!("token endpoint answered {}", status),
    }
}

#[async_trait]
impl AuthProvider for SpotifyAuth {
    fn authorize_url(&self) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope)
            .append_pair("show_dialog", "true");
        url.into()
    }

    async fn exchange_code(&self, code: &str) -> Result<Token, AuthError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn validate(&self, token: &Token) -> Option<Token> {
        if !token.covers_scope(&self.scope) {
            return None;
        }

        if !token.is_expired(Utc::now().timestamp()) {
            return Some(token.clone());
        }

        let refresh_token = token.refresh_token.as_deref()?;
        match self.refresh(refresh_token).await {
            Ok(mut fresh) => {
                if fresh.refresh_token.is_none() {
                    fresh.refresh_token = token.refresh_token.clone();
                }
                if fresh.scope.is_empty() {
                    fresh.scope = token.scope.clone();
                }
                Some(fresh)
            }
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                None
            }
        }
    }
}
