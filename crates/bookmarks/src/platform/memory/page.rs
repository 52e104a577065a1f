//! A bookmarks page kept as plain Rust values.

use std::cell::RefCell;

use crate::config::Selectors;
use crate::error::ClientError;
use crate::in_flight::Region;
use crate::page::{BookmarkFields, EventKind, Page, Trigger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub u64);

/// Where an event happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryTarget {
    EditLink(ItemId),
    TitleLink(ItemId),
    SaveForm(ItemId),
    SearchForm,
    Elsewhere,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryItem {
    pub id: ItemId,
    /// Inner HTML, or the whole `<li>` for items inserted by a save.
    pub html: String,
    /// Present while the item holds the edit form.
    pub form: Option<BookmarkFields>,
}

#[derive(Debug)]
pub struct MemoryPage {
    selectors: Selectors,
    state: RefCell<PageState>,
}

#[derive(Debug, Default)]
struct PageState {
    items: Vec<MemoryItem>,
    next_id: u64,
    query: String,
    results_html: String,
    alerts: Vec<String>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new(Selectors::default())
    }
}

impl MemoryPage {
    pub fn new(selectors: Selectors) -> Self {
        Self {
            selectors,
            state: RefCell::default(),
        }
    }

    /// Appends an item to the bookmarks list.
    pub fn push_item(&self, html: impl Into<String>) -> ItemId {
        let mut state = self.state.borrow_mut();
        let item = state.new_item(html.into());
        let id = item.id;
        state.items.push(item);
        id
    }

    pub fn items(&self) -> Vec<MemoryItem> {
        self.state.borrow().items.clone()
    }

    pub fn item(&self, id: ItemId) -> Option<MemoryItem> {
        self.state.borrow().find(id).cloned()
    }

    /// Types values into an item's edit form.
    pub fn fill_form(&self, id: ItemId, fields: BookmarkFields) -> Result<(), ClientError> {
        let mut state = self.state.borrow_mut();
        let form_id = &self.selectors.save_form_id;
        let form = state
            .find_mut(id)
            .and_then(|item| item.form.as_mut())
            .ok_or_else(|| ClientError::MissingElement(format!("#{form_id}")))?;
        *form = fields;
        Ok(())
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state.borrow_mut().query = query.into();
    }

    pub fn results_html(&self) -> String {
        self.state.borrow().results_html.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }
}

impl PageState {
    fn new_item(&mut self, html: String) -> MemoryItem {
        self.next_id += 1;
        MemoryItem {
            id: ItemId(self.next_id),
            html,
            form: None,
        }
    }

    fn find(&self, id: ItemId) -> Option<&MemoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn find_mut(&mut self, id: ItemId) -> Option<&mut MemoryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn missing_item(id: ItemId) -> ClientError {
        ClientError::MissingElement(format!("list item {}", id.0))
    }
}

impl Page for MemoryPage {
    type Item = ItemId;
    type Target = MemoryTarget;

    fn route(&self, kind: EventKind, target: &MemoryTarget) -> Option<Trigger<ItemId>> {
        let state = self.state.borrow();
        match (kind, *target) {
            (EventKind::Click, MemoryTarget::EditLink(id)) => {
                state.find(id).map(|_| Trigger::EditClicked(id))
            }
            (EventKind::Submit, MemoryTarget::SaveForm(id)) => state
                .find(id)
                .filter(|item| item.form.is_some())
                .map(|_| Trigger::SaveSubmitted(id)),
            (EventKind::Submit, MemoryTarget::SearchForm) => Some(Trigger::SearchSubmitted),
            _ => None,
        }
    }

    fn region_of(&self, item: &ItemId) -> Region {
        Region::Bookmark(item.0)
    }

    fn bookmark_url(&self, item: &ItemId) -> Result<String, ClientError> {
        let state = self.state.borrow();
        let item = state.find(*item).ok_or_else(|| PageState::missing_item(*item))?;
        title_href(&item.html).ok_or(ClientError::MissingBookmarkUrl)
    }

    fn set_item_html(&self, item: &ItemId, html: &str) -> Result<(), ClientError> {
        let has_form = html.contains(&format!("id=\"{}\"", self.selectors.save_form_id));
        let mut state = self.state.borrow_mut();
        let item = state
            .find_mut(*item)
            .ok_or_else(|| PageState::missing_item(*item))?;
        item.html = html.to_string();
        item.form = has_form.then(BookmarkFields::default);
        Ok(())
    }

    fn form_fields(&self, item: &ItemId) -> Result<BookmarkFields, ClientError> {
        let state = self.state.borrow();
        state
            .find(*item)
            .and_then(|item| item.form.clone())
            .ok_or_else(|| ClientError::MissingElement(format!("#{}", self.selectors.save_form_id)))
    }

    fn replace_item(&self, item: &ItemId, item_html: &str) -> Result<(), ClientError> {
        let mut state = self.state.borrow_mut();
        let index = state
            .items
            .iter()
            .position(|existing| existing.id == *item)
            .ok_or_else(|| PageState::missing_item(*item))?;
        let replacement = state.new_item(item_html.to_string());
        state.items.insert(index, replacement);
        state.items.remove(index + 1);
        Ok(())
    }

    fn query(&self) -> Result<String, ClientError> {
        Ok(self.state.borrow().query.clone())
    }

    fn set_results_html(&self, html: &str) -> Result<(), ClientError> {
        self.state.borrow_mut().results_html = html.to_string();
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }
}

/// `href` of the first tag carrying the `title` class.
fn title_href(html: &str) -> Option<String> {
    html.split('<')
        .map(|tag| tag.split('>').next().unwrap_or_default())
        .find(|tag| {
            attribute(tag, "class")
                .is_some_and(|class| class.split_whitespace().any(|name| name == "title"))
        })
        .and_then(|tag| attribute(tag, "href"))
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let start = tag.find(&format!(" {name}=\""))? + name.len() + 3;
    let length = tag[start..].find('"')?;
    Some(tag[start..start + length].to_string())
}
