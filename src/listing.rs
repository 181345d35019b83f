//! Repository listing state: search term, page number, the current page of
//! items and the flags that describe how it was obtained.
//!
//! Every fetch is identified by a generation. Only the response carrying the
//! current generation is applied; anything older is dropped, so a slow
//! response for a superseded query can never overwrite fresher state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::forge::Forge;
use crate::types::{ListingQuery, Page, RepositoryRef};

pub const NO_RESULTS_MESSAGE: &str =
    "No repositories found for the search query. Please try another term";

/// Process-unique generation ids, shared by every view that fetches.
pub fn next_generation() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// A fetch the caller must perform and report back with `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListingQuery,
}

/// Outcome of one listing fetch, flattened so it can cross the action channel.
pub type FetchOutcome = std::result::Result<Page<RepositoryRef>, String>;

#[derive(Debug, Clone)]
pub struct Listing {
    query: ListingQuery,
    items: Vec<RepositoryRef>,
    loading: bool,
    has_more: bool,
    no_results_message: Option<&'static str>,
    last_error: Option<String>,
    generation: u64,
}

impl Default for Listing {
    fn default() -> Self {
        Self::new()
    }
}

impl Listing {
    pub fn new() -> Self {
        Self {
            query: ListingQuery::default(),
            items: Vec::new(),
            loading: false,
            has_more: true,
            no_results_message: None,
            last_error: None,
            generation: 0,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.query.search_term
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn items(&self) -> &[RepositoryRef] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn no_results_message(&self) -> Option<&'static str> {
        self.no_results_message
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name() == name)
    }

    /// Change the search term. Always restarts at page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> FetchTicket {
        self.query.search_term = term.into();
        self.query.page = 1;
        self.begin_fetch()
    }

    /// Move to `requested`. Asking to go forward past a page known to be the
    /// last one wraps around to page 1.
    pub fn set_page(&mut self, requested: u32) -> FetchTicket {
        self.query.page = if requested > self.query.page && !self.has_more {
            1
        } else {
            requested
        };
        self.begin_fetch()
    }

    pub fn next_page(&mut self) -> FetchTicket {
        self.set_page(self.query.page + 1)
    }

    /// None on page 1, where going back is disabled.
    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if self.query.page <= 1 {
            return None;
        }
        Some(self.set_page(self.query.page - 1))
    }

    /// Start a fetch for the current query, superseding any fetch in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation = next_generation();
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Apply a fetch outcome. Returns false when the outcome was stale and
    /// therefore ignored.
    pub fn apply(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale listing response"
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                self.items = page.items;
                self.has_more = page.has_next;
                self.no_results_message = if self.items.is_empty() {
                    Some(NO_RESULTS_MESSAGE)
                } else {
                    None
                };
                self.last_error = None;
            }
            Err(msg) => {
                tracing::error!(error = %msg, query = ?self.query, "error fetching repositories");
                self.has_more = false;
                self.last_error = Some(msg);
            }
        }
        self.loading = false;
        true
    }

    /// Show a freshly created repository at the top of the current page.
    /// It lasts until the next fetch replaces the page.
    pub fn add_local_item(&mut self, mut item: RepositoryRef) {
        item.is_new = true;
        self.items.insert(0, item);
    }
}

/// Run the fetch described by a ticket and normalize the outcome.
pub async fn load(forge: &dyn Forge, query: &ListingQuery) -> FetchOutcome {
    forge
        .fetch_page(query)
        .await
        .map(|page| page.map(RepositoryRef::from))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::fake::{repo, FakeForge};

    async fn fetch(listing: &mut Listing, forge: &FakeForge, ticket: FetchTicket) -> bool {
        let outcome = load(forge, &ticket.query).await;
        listing.apply(ticket.generation, outcome)
    }

    fn names(listing: &Listing) -> Vec<&str> {
        listing.items().iter().map(|i| i.name()).collect()
    }

    #[test]
    fn search_term_resets_page() {
        let mut listing = Listing::new();
        let ticket = listing.set_page(4);
        assert_eq!(ticket.query.page, 4);

        let ticket = listing.set_search_term("foo");
        assert_eq!(listing.page(), 1);
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.search_term, "foo");
    }

    #[test]
    fn loading_spans_exactly_one_fetch() {
        let mut listing = Listing::new();
        assert!(!listing.loading());

        let ticket = listing.begin_fetch();
        assert!(listing.loading());

        listing.apply(ticket.generation, Err("boom".into()));
        assert!(!listing.loading());

        let ticket = listing.begin_fetch();
        assert!(listing.loading());
        listing.apply(ticket.generation, Ok(Page { items: vec![], has_next: false }));
        assert!(!listing.loading());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut listing = Listing::new();
        let first = listing.set_search_term("f");
        let second = listing.set_search_term("foo");

        let fresh = Page {
            items: vec![RepositoryRef::from(repo(1, "foo"))],
            has_next: false,
        };
        assert!(listing.apply(second.generation, Ok(fresh)));

        let stale = Page {
            items: vec![RepositoryRef::from(repo(2, "fab"))],
            has_next: true,
        };
        assert!(!listing.apply(first.generation, Ok(stale)));
        assert_eq!(names(&listing), vec!["foo"]);
        assert!(!listing.has_more());
    }

    #[test]
    fn stale_response_keeps_loading_for_current_fetch() {
        let mut listing = Listing::new();
        let first = listing.set_page(1);
        let _second = listing.set_page(2);

        listing.apply(first.generation, Err("late failure".into()));
        assert!(listing.loading());
        assert!(listing.has_more());
        assert_eq!(listing.last_error(), None);
    }

    #[test]
    fn forward_past_last_page_wraps_to_first() {
        let mut listing = Listing::new();
        let ticket = listing.set_page(2);
        listing.apply(ticket.generation, Ok(Page { items: vec![], has_next: false }));

        let ticket = listing.next_page();
        assert_eq!(ticket.query.page, 1);
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn backward_is_allowed_when_exhausted() {
        let mut listing = Listing::new();
        let ticket = listing.set_page(3);
        listing.apply(ticket.generation, Ok(Page { items: vec![], has_next: false }));

        let ticket = listing.prev_page().unwrap();
        assert_eq!(ticket.query.page, 2);
    }

    #[test]
    fn requested_page_is_taken_as_is_when_not_wrapping() {
        let mut listing = Listing::new();
        let ticket = listing.set_page(5);
        listing.apply(ticket.generation, Ok(Page { items: vec![], has_next: false }));

        let ticket = listing.set_page(2);
        assert_eq!(ticket.query.page, 2);
        listing.apply(ticket.generation, Ok(Page { items: vec![], has_next: true }));

        let ticket = listing.set_page(5);
        assert_eq!(ticket.query.page, 5);
    }

    #[test]
    fn prev_is_disabled_on_first_page() {
        let mut listing = Listing::new();
        assert!(listing.prev_page().is_none());
        assert!(!listing.loading());
    }

    #[test]
    fn failure_keeps_last_good_items() {
        let mut listing = Listing::new();
        let ticket = listing.begin_fetch();
        let page = Page {
            items: vec![RepositoryRef::from(repo(1, "keep"))],
            has_next: true,
        };
        listing.apply(ticket.generation, Ok(page));

        let ticket = listing.next_page();
        listing.apply(ticket.generation, Err("rate limited".into()));

        assert_eq!(names(&listing), vec!["keep"]);
        assert!(!listing.has_more());
        assert_eq!(listing.last_error(), Some("rate limited"));
        assert_eq!(listing.no_results_message(), None);
    }

    #[test]
    fn local_item_is_prepended_and_marked_new() {
        let mut listing = Listing::new();
        let ticket = listing.begin_fetch();
        let page = Page {
            items: vec![RepositoryRef::from(repo(1, "old"))],
            has_next: true,
        };
        listing.apply(ticket.generation, Ok(page));

        listing.add_local_item(RepositoryRef::from(repo(9, "fresh")));
        assert_eq!(names(&listing), vec!["fresh", "old"]);
        assert!(listing.items()[0].is_new);
        assert!(!listing.items()[1].is_new);
        assert!(listing.has_more());
        assert_eq!(listing.page(), 1);
        assert!(!listing.loading());
    }

    #[tokio::test]
    async fn empty_account_shows_no_results() {
        let forge = FakeForge::with_names(&[]);
        let mut listing = Listing::new();
        let ticket = listing.begin_fetch();
        fetch(&mut listing, &forge, ticket).await;

        assert!(listing.items().is_empty());
        assert_eq!(listing.no_results_message(), Some(NO_RESULTS_MESSAGE));
        assert!(!listing.has_more());
    }

    #[tokio::test]
    async fn search_pages_through_matches() {
        let forge = FakeForge::with_names(&[
            "foo-a", "bar", "foo-b", "foo-c", "baz", "foo-d", "foo-e",
        ]);
        let mut listing = Listing::new();

        let ticket = listing.set_search_term("foo");
        fetch(&mut listing, &forge, ticket).await;
        assert_eq!(names(&listing), vec!["foo-a", "foo-b", "foo-c"]);
        assert!(listing.has_more());

        let ticket = listing.next_page();
        fetch(&mut listing, &forge, ticket).await;
        assert_eq!(listing.page(), 2);
        assert_eq!(names(&listing), vec!["foo-d", "foo-e"]);
        assert!(!listing.has_more());
        assert_eq!(FakeForge::calls(&forge.search_calls), 2);
        assert_eq!(FakeForge::calls(&forge.list_calls), 0);
    }

    #[tokio::test]
    async fn fetch_replaces_local_items() {
        let forge = FakeForge::with_names(&["a", "b"]);
        let mut listing = Listing::new();
        listing.add_local_item(RepositoryRef::from(repo(7, "local")));

        let ticket = listing.begin_fetch();
        fetch(&mut listing, &forge, ticket).await;
        assert_eq!(names(&listing), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn network_failure_collapses_has_more() {
        let forge = FakeForge {
            fail_listing: true,
            ..FakeForge::with_names(&["a"])
        };
        let mut listing = Listing::new();
        assert!(listing.has_more());

        let ticket = listing.begin_fetch();
        fetch(&mut listing, &forge, ticket).await;
        assert!(!listing.has_more());
        assert!(listing.last_error().is_some());
        assert!(!listing.loading());
    }
}
