//! The seams between interaction logic and the platform it runs on.
//!
//! [`Page`] is the slice of the DOM the handlers touch and [`Transport`] is
//! how they reach the server. `platform::browser` implements both on top of
//! web-sys; `platform::memory` implements them in plain Rust for tests.

use std::future::Future;

use crate::error::ClientError;
use crate::in_flight::Region;
use crate::request::{Request, Response};

/// Values of the edit form, posted verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookmarkFields {
    pub url: String,
    pub title: String,
    /// One delimited string; splitting is the server's business.
    pub tags: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

/// What a delegated event asks for, once routed to its interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger<Item> {
    EditClicked(Item),
    SaveSubmitted(Item),
    SearchSubmitted,
}

pub trait Page {
    /// Handle to one bookmark list item.
    type Item: Clone + 'static;
    /// Whatever an event reports as its target.
    type Target;

    /// Routes an event caught at the document root.
    ///
    /// Returns `None` for events no interaction cares about; their default
    /// action must then be left alone.
    fn route(&self, kind: EventKind, target: &Self::Target) -> Option<Trigger<Self::Item>>;

    /// Stable region of an item, assigned on first use.
    fn region_of(&self, item: &Self::Item) -> Region;

    /// `href` of the item's title link.
    fn bookmark_url(&self, item: &Self::Item) -> Result<String, ClientError>;

    fn set_item_html(&self, item: &Self::Item, html: &str) -> Result<(), ClientError>;

    fn form_fields(&self, item: &Self::Item) -> Result<BookmarkFields, ClientError>;

    /// Inserts `item_html` right before `item`, then removes `item`.
    fn replace_item(&self, item: &Self::Item, item_html: &str) -> Result<(), ClientError>;

    fn query(&self) -> Result<String, ClientError>;

    fn set_results_html(&self, html: &str) -> Result<(), ClientError>;

    /// Blocking, user-facing message.
    fn alert(&self, message: &str);
}

pub trait Transport {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, ClientError>> + 'static;
}
