//! Edit, save and search interactions.
//!
//! Each interaction does its synchronous part (reading the DOM, taking an
//! in-flight ticket, issuing the request) as soon as it is called and returns
//! the continuation that applies the response. Events are routed by the page,
//! so freshly inserted items and injected forms are handled without binding
//! anything to them.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::fragment::first_list_item;
use crate::in_flight::{InFlight, Region, Ticket};
use crate::page::{EventKind, Page, Transport, Trigger};
use crate::request::Response;

/// How a continuation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The server rejected the bookmark; the form is left for another try.
    Rejected,
    /// A newer request for the same region was issued meanwhile.
    Stale,
}

/// Reading of a save endpoint response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome<'a> {
    Saved { item_html: &'a str },
    Rejected,
}

impl<'a> SaveOutcome<'a> {
    pub fn parse(body: &'a str, failure_sentinel: &str) -> Result<Self, ClientError> {
        if body.trim_ascii() == failure_sentinel {
            return Ok(Self::Rejected);
        }
        first_list_item(body)
            .map(|item_html| Self::Saved { item_html })
            .ok_or(ClientError::MissingListItem)
    }
}

pub struct Client<P, T> {
    inner: Rc<Inner<P, T>>,
}

struct Inner<P, T> {
    page: P,
    transport: T,
    config: ClientConfig,
    in_flight: RefCell<InFlight>,
}

impl<P, T> Clone for Client<P, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: Page + 'static, T: Transport + 'static> Client<P, T> {
    pub fn new(page: P, transport: T, config: ClientConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                page,
                transport,
                config,
                in_flight: RefCell::new(InFlight::new()),
            }),
        }
    }

    pub fn page(&self) -> &P {
        &self.inner.page
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn is_pending(&self, region: Region) -> bool {
        self.inner.in_flight.borrow().pending(region)
    }

    /// Handles an event caught at the document root.
    ///
    /// `Some` means the event belongs to an interaction: the caller must
    /// prevent its default action and drive the returned continuation.
    pub fn handle_event(
        &self,
        kind: EventKind,
        target: &P::Target,
    ) -> Option<LocalBoxFuture<'static, ()>> {
        let trigger = self.inner.page.route(kind, target)?;
        let (interaction, continuation) = match trigger {
            Trigger::EditClicked(item) => ("edit", self.edit(item).boxed_local()),
            Trigger::SaveSubmitted(item) => ("save", self.save(item).boxed_local()),
            Trigger::SearchSubmitted => ("search", self.search().boxed_local()),
        };
        Some(
            async move {
                match continuation.await {
                    Ok(completion) => log::debug!("{interaction}: {completion:?}"),
                    Err(error @ ClientError::MissingListItem) => {
                        log::error!("{interaction}: {error}")
                    }
                    Err(error) => log::warn!("{interaction}: {error}"),
                }
            }
            .boxed_local(),
        )
    }

    /// Swaps the item's content for the server-rendered edit form.
    pub fn edit(
        &self,
        item: P::Item,
    ) -> impl Future<Output = Result<Completion, ClientError>> + 'static {
        let started = self.inner.page.bookmark_url(&item).map(|bookmark_url| {
            let ticket = self.begin(self.inner.page.region_of(&item));
            let request = self.inner.config.endpoints.edit_form(&bookmark_url);
            log::debug!("Fetching edit form: {}", request.url);
            (ticket, self.inner.transport.send(request))
        });
        let client = self.clone();
        async move {
            let (ticket, pending) = started?;
            let response = pending.await;
            client.settle(ticket, response, |page, response| {
                let response = response.success()?;
                page.set_item_html(&item, &response.body)?;
                Ok(Completion::Applied)
            })
        }
    }

    /// Posts the edit form and puts the saved item in place of the old one.
    pub fn save(
        &self,
        item: P::Item,
    ) -> impl Future<Output = Result<Completion, ClientError>> + 'static {
        let started = self.inner.page.form_fields(&item).map(|fields| {
            let ticket = self.begin(self.inner.page.region_of(&item));
            let request = self.inner.config.endpoints.save(&fields);
            log::debug!("Saving bookmark: {}", fields.url);
            (ticket, self.inner.transport.send(request))
        });
        let client = self.clone();
        async move {
            let (ticket, pending) = started?;
            let response = pending.await;
            client.settle(ticket, response, |page, response| {
                let response = response.success()?;
                match SaveOutcome::parse(&response.body, &client.inner.config.failure_sentinel)? {
                    SaveOutcome::Rejected => {
                        page.alert(&client.inner.config.failure_alert);
                        Ok(Completion::Rejected)
                    }
                    SaveOutcome::Saved { item_html } => {
                        page.replace_item(&item, item_html)?;
                        Ok(Completion::Applied)
                    }
                }
            })
        }
    }

    /// Replaces the results container with the server's results fragment.
    ///
    /// Error statuses are not special here: their body becomes the results.
    pub fn search(&self) -> impl Future<Output = Result<Completion, ClientError>> + 'static {
        let started = self.inner.page.query().map(|query| {
            let ticket = self.begin(Region::SearchResults);
            let request = self.inner.config.endpoints.search(&query);
            log::debug!("Searching: {}", request.url);
            (ticket, self.inner.transport.send(request))
        });
        let client = self.clone();
        async move {
            let (ticket, pending) = started?;
            let response = pending.await;
            client.settle(ticket, response, |page, response| {
                page.set_results_html(&response.body)?;
                Ok(Completion::Applied)
            })
        }
    }

    fn begin(&self, region: Region) -> Ticket {
        self.inner.in_flight.borrow_mut().begin(region)
    }

    /// Retires `ticket` and applies the response if the ticket was still current.
    fn settle(
        &self,
        ticket: Ticket,
        response: Result<Response, ClientError>,
        apply: impl FnOnce(&P, Response) -> Result<Completion, ClientError>,
    ) -> Result<Completion, ClientError> {
        let current = {
            let mut in_flight = self.inner.in_flight.borrow_mut();
            let current = in_flight.is_current(&ticket);
            in_flight.finish(&ticket);
            current
        };
        if !current {
            log::debug!("Dropping stale response for {:?}", ticket.region);
            return Ok(Completion::Stale);
        }
        let response = response?;
        if !response.is_success() {
            log::debug!("Server answered {} for {:?}", response.status, ticket.region);
        }
        apply(&self.inner.page, response)
    }
}
