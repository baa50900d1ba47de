mod session;
mod token;

pub use session::SESSION_COOKIE;
pub use session::Session;
pub use session::SessionId;
pub use session::SessionStore;
pub use session::session_cookie;
pub use token::TokenCache;
