//! In-memory platform for deterministic testing.
//!
//! `MemoryPage` models just the DOM the interactions use and
//! `ScriptedTransport` parks every request until it is answered by hand.
//! Driving continuations is left to whatever local executor the caller runs.

mod page;
mod transport;

pub use page::{ItemId, MemoryItem, MemoryPage, MemoryTarget};
pub use transport::ScriptedTransport;

use crate::client::Client;
use crate::config::ClientConfig;

pub type MemoryClient = Client<MemoryPage, ScriptedTransport>;

/// A client over an empty in-memory page, with default configuration.
pub fn client() -> MemoryClient {
    let config = ClientConfig::default();
    Client::new(
        MemoryPage::new(config.selectors.clone()),
        ScriptedTransport::new(),
        config,
    )
}
