//! Client-side core of the admin panel: the session gate and the roster
//! view-model. Nothing here renders; a front-end binds to these objects.

pub mod api;
pub mod guard;
pub mod photo;
pub mod roster;
pub mod session;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status; `message` is the server's `message` field.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
