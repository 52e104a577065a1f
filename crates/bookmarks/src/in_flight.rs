//! Per-region in-flight tokens.
//!
//! Every request that will mutate a region takes a [`Ticket`] first. Taking a
//! new ticket for the same region invalidates the older one, so when two
//! responses race only the most recently requested one is applied.

use std::collections::HashMap;

/// A DOM area written by continuations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// One bookmark list item, shared by its edit and save requests.
    Bookmark(u64),
    SearchResults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub region: Region,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct InFlight {
    latest: HashMap<Region, u64>,
    next_generation: u64,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, region: Region) -> Ticket {
        self.next_generation += 1;
        self.latest.insert(region, self.next_generation);
        Ticket {
            region,
            generation: self.next_generation,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.region) == Some(&ticket.generation)
    }

    /// Retires a ticket. A stale ticket leaves the newer one in place.
    pub fn finish(&mut self, ticket: &Ticket) {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.region);
        }
    }

    pub fn pending(&self, region: Region) -> bool {
        self.latest.contains_key(&region)
    }
}
