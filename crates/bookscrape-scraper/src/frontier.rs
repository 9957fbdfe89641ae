//! Pending page visits for a crawl.
//!
//! Listing pages are handed out one at a time in discovery order; detail
//! pages are drained in batches so they can be fetched concurrently.

use std::collections::VecDeque;
use std::fmt;

use crate::site::SiteConfig;

/// Which handler a visit request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Listing,
    Detail,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Listing => write!(f, "listing"),
            PageKind::Detail => write!(f, "detail"),
        }
    }
}

/// A request to visit one page, emitted by a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRequest {
    pub url: String,
    pub kind: PageKind,
}

impl VisitRequest {
    #[must_use]
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: PageKind::Listing,
        }
    }

    #[must_use]
    pub fn detail(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: PageKind::Detail,
        }
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    listings: VecDeque<String>,
    details: VecDeque<String>,
}

impl Frontier {
    /// A frontier holding only the seed listing page.
    #[must_use]
    pub fn seeded(site: &SiteConfig) -> Self {
        let mut frontier = Self::default();
        frontier.listings.push_back(site.root_url().to_owned());
        frontier
    }

    /// Queues `requests`, dropping any whose host is not the site's host.
    ///
    /// Returns the number of requests accepted.
    pub fn extend<I>(&mut self, site: &SiteConfig, requests: I) -> usize
    where
        I: IntoIterator<Item = VisitRequest>,
    {
        let mut accepted = 0;
        for request in requests {
            if !site.is_on_site(&request.url) {
                tracing::debug!(url = %request.url, kind = %request.kind, "dropping off-site request");
                continue;
            }
            match request.kind {
                PageKind::Listing => self.listings.push_back(request.url),
                PageKind::Detail => self.details.push_back(request.url),
            }
            accepted += 1;
        }
        accepted
    }

    pub fn next_listing(&mut self) -> Option<String> {
        self.listings.pop_front()
    }

    /// Removes and returns every queued detail page.
    pub fn drain_details(&mut self) -> Vec<String> {
        self.details.drain(..).collect()
    }
}
