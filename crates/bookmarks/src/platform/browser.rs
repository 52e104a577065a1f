//! Browser platform: the live document, `fetch`, and delegated listeners.
//!
//! One `click` and one `submit` listener on the document route every event to
//! its interaction, so list items inserted by a save and edit forms injected
//! by an edit are handled without re-binding anything.

mod console;
mod fetch;
mod page;

pub use fetch::FetchTransport;
pub use page::DomPage;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event};
use zoon::Task;

use crate::client::Client;
use crate::config::{CONFIG_ELEMENT_ID, ClientConfig};
use crate::error::ClientError;
use crate::page::EventKind;

pub type BrowserClient = Client<DomPage, FetchTransport>;

type Listener = Closure<dyn FnMut(Event)>;

thread_local! {
    static INSTALLATION: RefCell<Option<Installation>> = const { RefCell::new(None) };
}

/// Delegated listeners attached to a document. Dropping it detaches them.
pub struct Installation {
    document: Document,
    listeners: Vec<(&'static str, Listener)>,
}

impl Drop for Installation {
    fn drop(&mut self) {
        for (event_name, listener) in &self.listeners {
            let _ = self
                .document
                .remove_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref());
        }
    }
}

/// Entry point for the frontend binary.
///
/// Expects the document to be parsed already (module scripts are deferred).
/// Installs the client for the lifetime of the page; a second call replaces
/// the first installation.
pub fn start() {
    let installed = window_document().and_then(|document| {
        let config = load_config(&document)?;
        console::init(config.debug);
        install(document, config)
    });
    match installed {
        Ok(installation) => {
            log::info!("Bookmarks client installed");
            INSTALLATION.with(|cell| *cell.borrow_mut() = Some(installation));
        }
        Err(error) => zoon::eprintln!("[bookmarks] Failed to start: {error}"),
    }
}

/// Reads overrides from the `<script type="application/json">` config element, if any.
pub fn load_config(document: &Document) -> Result<ClientConfig, ClientError> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID) {
        Some(element) => ClientConfig::from_json(&element.text_content().unwrap_or_default()),
        None => Ok(ClientConfig::default()),
    }
}

pub fn install(document: Document, config: ClientConfig) -> Result<Installation, ClientError> {
    let window = document
        .default_view()
        .ok_or_else(|| ClientError::MissingElement("window".to_string()))?;
    let client = Client::new(
        DomPage::new(document.clone(), &config),
        FetchTransport::new(window),
        config,
    );
    let mut installation = Installation {
        document,
        listeners: Vec::new(),
    };
    for (event_name, kind) in [("click", EventKind::Click), ("submit", EventKind::Submit)] {
        let listener = delegate(client.clone(), kind);
        installation
            .document
            .add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())
            .map_err(ClientError::from_js)?;
        installation.listeners.push((event_name, listener));
    }
    Ok(installation)
}

fn delegate(client: BrowserClient, kind: EventKind) -> Listener {
    Closure::wrap(Box::new(move |event: Event| {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        if let Some(continuation) = client.handle_event(kind, &target) {
            event.prevent_default();
            Task::start(continuation);
        }
    }) as Box<dyn FnMut(Event)>)
}

fn window_document() -> Result<Document, ClientError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ClientError::MissingElement("document".to_string()))
}
