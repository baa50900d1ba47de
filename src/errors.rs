use std::error::Error as StdError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("SERVER_ADDRESS is not a valid socket address: {0}")]
    InvalidAddress(String),
    #[error("FETCH_RETRIES is not a number: {0}")]
    InvalidRetries(String),
}

/// Failures of the authorization phase. These end in a redirect or in
/// forcing the user through the provider again.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization was cancelled: {0}")]
    Cancelled(String),
    #[error("Authorization callback carried no code")]
    MissingCode,
    #[error("Code exchange failed: {0}")]
    Exchange(String),
    #[error("Token not found, please authenticate.")]
    TokenMissing,
    #[error("Token validation failed, please authenticate again.")]
    TokenInvalid,
}

/// Failures of the data phase, shown to the user on the error page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("You need to listen to more songs before trying this :D")]
    InsufficientHistory { found: usize },
    #[error("An error occurred: {}", with_causes(.0))]
    Http(#[from] reqwest::Error),
    #[error("An error occurred: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("An error occurred: {0}")]
    Upstream(String),
}

/// `err` followed by every error in its source chain.
///
/// reqwest keeps the interesting part (refused connection, TLS failure)
/// in the sources and leaves it out of its own message.
pub fn with_causes(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// Anything that sends a page request to the error page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("An error occurred: {0}")]
    Render(#[from] serde_json::Error),
}
