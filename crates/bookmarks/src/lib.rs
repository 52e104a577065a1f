//! In-place bookmark editing and asynchronous search for the bookmarks site.
//!
//! The server renders every form, list item and result set; this crate only
//! moves fragments between it and the page. Interaction logic lives in
//! [`client`] and talks to the page through the traits in [`page`], so the
//! same code drives the real document (`platform::browser`) and the
//! in-memory one used by tests (`platform::memory`).

pub mod client;
pub mod config;
pub mod error;
pub mod fragment;
pub mod in_flight;
pub mod page;
pub mod platform;
pub mod request;

pub use client::{Client, Completion, SaveOutcome};
pub use config::ClientConfig;
pub use error::ClientError;
