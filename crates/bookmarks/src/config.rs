//! Client configuration: the DOM contract and the server endpoints.
//!
//! Every field has a default matching the bookmarks site templates, so an
//! empty JSON object (or no configuration at all) yields a working client.

use serde::Deserialize;

use crate::error::ClientError;

/// Id of the optional `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "bookmarks-client-config";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub selectors: Selectors,
    pub endpoints: Endpoints,
    /// Body the save endpoint returns when the bookmark fails validation.
    pub failure_sentinel: String,
    pub failure_alert: String,
    /// Also log debug records to the developer console.
    pub debug: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// The list holding all bookmark items.
    pub list: String,
    /// Edit affordance inside an item.
    pub edit: String,
    /// Title link inside an item; its `href` is the bookmark URL.
    pub title: String,
    pub item: String,
    pub save_form_id: String,
    pub url_field_id: String,
    pub title_field_id: String,
    pub tags_field_id: String,
    pub search_form_id: String,
    pub query_field_id: String,
    pub results_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub save: String,
    pub search: String,
    /// Bare query key telling the server to answer with a fragment.
    pub ajax_marker: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            endpoints: Endpoints::default(),
            failure_sentinel: "failure".to_string(),
            failure_alert: "Failed to validate bookmark before saving.".to_string(),
            debug: false,
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            list: "ul.bookmarks".to_string(),
            edit: ".edit".to_string(),
            title: ".title".to_string(),
            item: "li".to_string(),
            save_form_id: "save-form".to_string(),
            url_field_id: "id_url".to_string(),
            title_field_id: "id_title".to_string(),
            tags_field_id: "id_tags".to_string(),
            search_form_id: "search-form".to_string(),
            query_field_id: "id_query".to_string(),
            results_id: "search-results".to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            save: "/save/".to_string(),
            search: "/search/".to_string(),
            ajax_marker: "ajax".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parses overrides from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Selector matching edit affordances that belong to the bookmarks list.
    pub fn edit_affordance_selector(&self) -> String {
        format!("{} {}", self.selectors.list, self.selectors.edit)
    }
}
