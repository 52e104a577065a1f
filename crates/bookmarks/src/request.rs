//! Requests sent to the bookmarks server.
//!
//! URL components are encoded like `encodeURIComponent` and post bodies like
//! jQuery's `$.param`, which is what the server-side views were written against.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::Endpoints;
use crate::error::ClientError;
use crate::page::BookmarkFields;

/// Bytes `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Form-urlencoded body, only for posts.
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Rejects non-2xx responses so their body never reaches the page.
    pub fn success(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status(self.status))
        }
    }
}

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Encodes `key=value` pairs joined by `&`, spaces as `+`.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_form_component(key),
                encode_form_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_form_component(value: &str) -> String {
    encode_uri_component(value).replace("%20", "+")
}

impl Endpoints {
    /// `GET {save}?ajax&url=...` asking for the edit form of one bookmark.
    pub fn edit_form(&self, bookmark_url: &str) -> Request {
        Request {
            method: Method::Get,
            url: format!(
                "{}?{}&url={}",
                self.save,
                self.ajax_marker,
                encode_uri_component(bookmark_url)
            ),
            body: None,
        }
    }

    /// `POST {save}?ajax` with the edited fields.
    pub fn save(&self, fields: &BookmarkFields) -> Request {
        Request {
            method: Method::Post,
            url: format!("{}?{}", self.save, self.ajax_marker),
            body: Some(encode_form(&[
                ("url", &fields.url),
                ("title", &fields.title),
                ("tags", &fields.tags),
            ])),
        }
    }

    /// `GET {search}?ajax&query=...`.
    pub fn search(&self, query: &str) -> Request {
        Request {
            method: Method::Get,
            url: format!(
                "{}?{}&query={}",
                self.search,
                self.ajax_marker,
                encode_uri_component(query)
            ),
            body: None,
        }
    }
}
