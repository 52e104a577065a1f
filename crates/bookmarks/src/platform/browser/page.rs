//! The live document as a [`Page`].

use std::cell::Cell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement};

use crate::config::{ClientConfig, Selectors};
use crate::error::ClientError;
use crate::in_flight::Region;
use crate::page::{BookmarkFields, EventKind, Page, Trigger};

/// Marks list items that already took part in a request.
const REGION_ATTRIBUTE: &str = "data-bookmark-region";

pub struct DomPage {
    document: Document,
    selectors: Selectors,
    edit_selector: String,
    last_region: Cell<u64>,
}

impl DomPage {
    pub fn new(document: Document, config: &ClientConfig) -> Self {
        Self {
            document,
            selectors: config.selectors.clone(),
            edit_selector: config.edit_affordance_selector(),
            last_region: Cell::new(0),
        }
    }

    fn element_by_id(&self, id: &str) -> Result<Element, ClientError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| ClientError::MissingElement(format!("#{id}")))
    }

    fn closest_item(&self, element: &Element) -> Option<Element> {
        element.closest(&self.selectors.item).ok().flatten()
    }

    fn field_value(&self, scope: &Element, id: &str) -> Result<String, ClientError> {
        let field = scope
            .query_selector(&format!("#{id}"))
            .map_err(ClientError::from_js)?
            .ok_or_else(|| ClientError::MissingElement(format!("#{id}")))?;
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            return Ok(input.value());
        }
        if let Some(text_area) = field.dyn_ref::<HtmlTextAreaElement>() {
            return Ok(text_area.value());
        }
        Err(ClientError::MissingElement(format!("#{id} (not a text field)")))
    }
}

impl Page for DomPage {
    type Item = Element;
    type Target = Element;

    fn route(&self, kind: EventKind, target: &Element) -> Option<Trigger<Element>> {
        match kind {
            EventKind::Click => {
                let edit = target.closest(&self.edit_selector).ok()??;
                self.closest_item(&edit).map(Trigger::EditClicked)
            }
            EventKind::Submit => {
                let id = target.id();
                if id == self.selectors.save_form_id {
                    self.closest_item(target).map(Trigger::SaveSubmitted)
                } else if id == self.selectors.search_form_id {
                    Some(Trigger::SearchSubmitted)
                } else {
                    None
                }
            }
        }
    }

    fn region_of(&self, item: &Element) -> Region {
        if let Some(region) = item
            .get_attribute(REGION_ATTRIBUTE)
            .and_then(|value| value.parse().ok())
        {
            return Region::Bookmark(region);
        }
        let region = self.last_region.get() + 1;
        self.last_region.set(region);
        if let Err(error) = item.set_attribute(REGION_ATTRIBUTE, &region.to_string()) {
            log::warn!("Failed to mark list item region: {error:?}");
        }
        Region::Bookmark(region)
    }

    fn bookmark_url(&self, item: &Element) -> Result<String, ClientError> {
        item.query_selector(&self.selectors.title)
            .map_err(ClientError::from_js)?
            .and_then(|title| title.get_attribute("href"))
            .ok_or(ClientError::MissingBookmarkUrl)
    }

    fn set_item_html(&self, item: &Element, html: &str) -> Result<(), ClientError> {
        item.set_inner_html(html);
        Ok(())
    }

    fn form_fields(&self, item: &Element) -> Result<BookmarkFields, ClientError> {
        Ok(BookmarkFields {
            url: self.field_value(item, &self.selectors.url_field_id)?,
            title: self.field_value(item, &self.selectors.title_field_id)?,
            tags: self.field_value(item, &self.selectors.tags_field_id)?,
        })
    }

    fn replace_item(&self, item: &Element, item_html: &str) -> Result<(), ClientError> {
        item.insert_adjacent_html("beforebegin", item_html)
            .map_err(ClientError::from_js)?;
        item.remove();
        Ok(())
    }

    fn query(&self) -> Result<String, ClientError> {
        let field = self.element_by_id(&self.selectors.query_field_id)?;
        field
            .dyn_into::<HtmlInputElement>()
            .map(|input| input.value())
            .map_err(|_| {
                ClientError::MissingElement(format!(
                    "#{} (not an input)",
                    self.selectors.query_field_id
                ))
            })
    }

    fn set_results_html(&self, html: &str) -> Result<(), ClientError> {
        self.element_by_id(&self.selectors.results_id)?
            .set_inner_html(html);
        Ok(())
    }

    fn alert(&self, message: &str) {
        if let Some(window) = self.document.default_view() {
            let _ = window.alert_with_message(message);
        }
    }
}
