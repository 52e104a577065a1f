//! Errors raised while wiring or running an interaction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a readable response body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status where only success is applied.
    #[error("Server answered with status {0}")]
    Status(u16),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Bookmark item has no title link href")]
    MissingBookmarkUrl,

    /// Save response was neither the failure sentinel nor a fragment with a list item.
    #[error("Save response contains no list item")]
    MissingListItem,

    #[error("Invalid client configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl ClientError {
    /// Converts a thrown JS value into a transport error.
    ///
    /// JS exceptions carry no structure we rely on, so only their debug text is kept.
    pub fn from_js(value: impl std::fmt::Debug) -> Self {
        Self::Transport(format!("{value:?}"))
    }
}
