#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The provider's login attempt produced no usable session.
    #[error("login failed: provider returned no session")]
    LoginFailed,

    /// A session-dependent operation was invoked before a successful login.
    #[error("not authenticated: call login() first")]
    NotAuthenticated,

    /// Provider or network fault, surfaced with the failing operation.
    #[error("provider error during {operation}: {detail}")]
    Provider {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
