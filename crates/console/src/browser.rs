//! Paged, filter-keyed views on the exercise catalog and the user directory.
//!
//! Every filter change starts a new generation and resets paging to the first page. Responses
//! are tagged with the generation of their request and dropped if the generation has moved on,
//! so the result of the newest filter always wins.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use coach_domain::{
    Exercise, ExerciseFilter, ExerciseService, Page, PageRequest, ReadError, User, UserFilter,
    UserService,
};
use log::debug;

#[allow(async_fn_in_trait)]
pub trait Listing {
    type Filter: Clone + PartialEq + Default;
    type Item: Clone;

    async fn list(
        &self,
        filter: &Self::Filter,
        page: PageRequest,
    ) -> Result<Page<Self::Item>, ReadError>;
}

pub struct Exercises<S>(pub Arc<S>);

impl<S: ExerciseService> Listing for Exercises<S> {
    type Filter = ExerciseFilter;
    type Item = Exercise;

    async fn list(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> Result<Page<Exercise>, ReadError> {
        self.0.get_exercises(filter, page).await
    }
}

pub struct AvailableUsers<S>(pub Arc<S>);

impl<S: UserService> Listing for AvailableUsers<S> {
    type Filter = UserFilter;
    type Item = User;

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, ReadError> {
        self.0.get_available_users(filter, page).await
    }
}

pub type ExerciseBrowser<S> = Browser<Exercises<S>>;
pub type UserBrowser<S> = Browser<AvailableUsers<S>>;

/// Waits for a quiet period and reports whether no newer call arrived in the meantime.
pub struct Debounce {
    quiet: Duration,
    generation: AtomicU64,
}

impl Debounce {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn settle(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.quiet.is_zero() {
            tokio::time::sleep(self.quiet).await;
        }
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<F> {
    pub token: u64,
    pub filter: F,
    pub request: PageRequest,
}

#[derive(Debug, Clone)]
pub struct Buffer<F, T> {
    filter: F,
    items: Vec<T>,
    loaded: Option<Page<()>>,
    page_size: u32,
    token: u64,
}

impl<F: Clone + PartialEq, T> Buffer<F, T> {
    pub fn new(filter: F, page_size: u32) -> Self {
        Self {
            filter,
            items: vec![],
            loaded: None,
            page_size,
            token: 0,
        }
    }

    /// Starts over at the first page if the filter has changed.
    pub fn set_filter(&mut self, filter: F) -> Option<Ticket<F>> {
        if filter == self.filter && self.loaded.is_some() {
            return None;
        }
        self.filter = filter;
        Some(self.restart())
    }

    /// Starts over at the first page of the current filter.
    pub fn restart(&mut self) -> Ticket<F> {
        self.token += 1;
        self.items.clear();
        self.loaded = None;
        Ticket {
            token: self.token,
            filter: self.filter.clone(),
            request: PageRequest::first(self.page_size),
        }
    }

    pub fn next_page(&self) -> Option<Ticket<F>> {
        let loaded = self.loaded.as_ref()?;
        if !loaded.has_more() {
            return None;
        }
        Some(Ticket {
            token: self.token,
            filter: self.filter.clone(),
            request: PageRequest {
                page: loaded.page,
                page_size: self.page_size,
            }
            .next(),
        })
    }

    /// Returns false if the response belongs to an outdated request.
    pub fn accept(&mut self, ticket: &Ticket<F>, page: Page<T>) -> bool {
        let expected = self.loaded.as_ref().map_or(1, |p| p.page + 1);
        if ticket.token != self.token || ticket.request.page != expected {
            return false;
        }
        self.loaded = Some(Page {
            items: vec![],
            page: page.page,
            total_pages: page.total_pages,
        });
        self.items.extend(page.items);
        true
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn filter(&self) -> &F {
        &self.filter
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.loaded.as_ref().is_some_and(Page::has_more)
    }
}

pub struct Browser<L: Listing> {
    listing: L,
    debounce: Debounce,
    buffer: Mutex<Buffer<L::Filter, L::Item>>,
}

impl<L: Listing> Browser<L> {
    pub fn new(listing: L, page_size: u32, quiet: Duration) -> Self {
        Self {
            listing,
            debounce: Debounce::new(quiet),
            buffer: Mutex::new(Buffer::new(L::Filter::default(), page_size)),
        }
    }

    /// Lists the first page for `filter` once the filter has settled.
    ///
    /// Returns false if the filter did not change or was superseded by a newer one.
    pub async fn search(&self, filter: L::Filter) -> Result<bool, ReadError> {
        let Some(ticket) = self.buffer().set_filter(filter) else {
            return Ok(false);
        };
        if !self.debounce.settle().await {
            debug!("dropped superseded search");
            return Ok(false);
        }
        self.load(&ticket).await
    }

    /// Appends the next page of the current filter.
    pub async fn load_more(&self) -> Result<bool, ReadError> {
        let Some(ticket) = self.buffer().next_page() else {
            return Ok(false);
        };
        self.load(&ticket).await
    }

    /// Lists the first page of the current filter again.
    pub async fn reload(&self) -> Result<bool, ReadError> {
        let ticket = self.buffer().restart();
        self.load(&ticket).await
    }

    pub fn items(&self) -> Vec<L::Item> {
        self.buffer().items().to_vec()
    }

    pub fn filter(&self) -> L::Filter {
        self.buffer().filter().clone()
    }

    pub fn has_more(&self) -> bool {
        self.buffer().has_more()
    }

    async fn load(&self, ticket: &Ticket<L::Filter>) -> Result<bool, ReadError> {
        let page = self.listing.list(&ticket.filter, ticket.request).await?;
        let accepted = self.buffer().accept(ticket, page);
        if !accepted {
            debug!("dropped outdated page {}", ticket.request.page);
        }
        Ok(accepted)
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, Buffer<L::Filter, L::Item>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use coach_domain::{MuscleGroup, Service};
    use coach_storage::in_memory::InMemory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn page(items: &[u32], page: u32, total_pages: u32) -> Page<u32> {
        Page {
            items: items.to_vec(),
            page,
            total_pages,
        }
    }

    fn name(title: &str) -> coach_domain::Name {
        coach_domain::Name::new(title).unwrap()
    }

    async fn catalog(page_size: u32, quiet: Duration) -> ExerciseBrowser<Service<InMemory>> {
        let store = InMemory::new();
        for (id, title, muscle_group) in [
            (1, "Bench Press", MuscleGroup::Chest),
            (2, "Push Up", MuscleGroup::Chest),
            (3, "Pull Up", MuscleGroup::Back),
            (4, "Row", MuscleGroup::Back),
            (5, "Plank", MuscleGroup::Core),
        ] {
            store.insert_exercise(Exercise {
                id: id.into(),
                title: name(title),
                muscle_group,
                description: String::new(),
                video: None,
                duration: None,
            })
            .unwrap();
        }
        Browser::new(Exercises(Arc::new(Service::new(store))), page_size, quiet)
    }

    #[test]
    fn test_buffer_paging() {
        let mut buffer = Buffer::<&str, u32>::new("", 2);
        assert_eq!(buffer.next_page(), None);

        let first = buffer.set_filter("a").unwrap();
        assert_eq!(first.request, PageRequest::first(2));
        assert!(buffer.accept(&first, page(&[1, 2], 1, 2)));
        assert!(buffer.has_more());

        let second = buffer.next_page().unwrap();
        assert_eq!(second.request.page, 2);
        assert!(buffer.accept(&second, page(&[3], 2, 2)));
        assert_eq!(buffer.items(), &[1, 2, 3]);
        assert!(!buffer.has_more());
        assert_eq!(buffer.next_page(), None);

        assert_eq!(buffer.set_filter("a"), None);
    }

    #[test]
    fn test_buffer_drops_outdated_response() {
        let mut buffer = Buffer::<&str, u32>::new("", 10);
        let stale = buffer.set_filter("p").unwrap();
        let current = buffer.set_filter("pu").unwrap();
        assert!(buffer.accept(&current, page(&[2, 3], 1, 1)));
        assert!(!buffer.accept(&stale, page(&[1, 2, 3, 5], 1, 1)));
        assert_eq!(buffer.items(), &[2, 3]);
        assert_eq!(*buffer.filter(), "pu");
    }

    #[test]
    fn test_buffer_drops_duplicate_page() {
        let mut buffer = Buffer::<&str, u32>::new("", 1);
        let first = buffer.set_filter("a").unwrap();
        assert!(buffer.accept(&first, page(&[1], 1, 3)));
        let second = buffer.next_page().unwrap();
        assert!(buffer.accept(&second, page(&[2], 2, 3)));
        assert!(!buffer.accept(&second, page(&[2], 2, 3)));
        assert_eq!(buffer.items(), &[1, 2]);
    }

    #[rstest]
    #[case("", &[], 5)]
    #[case("up", &[], 2)]
    #[case("", &[MuscleGroup::Back], 2)]
    #[case("u", &[MuscleGroup::Chest, MuscleGroup::Core], 1)]
    #[tokio::test]
    async fn test_search(
        #[case] search: &str,
        #[case] muscle_groups: &[MuscleGroup],
        #[case] expected: usize,
    ) {
        let browser = catalog(20, Duration::ZERO).await;
        let filter = ExerciseFilter {
            search: search.to_string(),
            muscle_groups: muscle_groups.iter().copied().collect(),
        };
        assert!(browser.search(filter.clone()).await.unwrap());
        assert_eq!(browser.items().len(), expected);
        assert_eq!(browser.filter(), filter);
    }

    #[tokio::test]
    async fn test_load_more_and_reset() {
        let browser = catalog(2, Duration::ZERO).await;
        assert!(browser.search(ExerciseFilter::default()).await.unwrap());
        assert!(!browser.search(ExerciseFilter::default()).await.unwrap());
        assert!(browser.load_more().await.unwrap());
        assert!(browser.load_more().await.unwrap());
        assert!(!browser.load_more().await.unwrap());
        assert_eq!(
            browser
                .items()
                .iter()
                .map(|e| e.title.to_string())
                .collect::<Vec<_>>(),
            vec!["Bench Press", "Plank", "Pull Up", "Push Up", "Row"]
        );

        let filter = ExerciseFilter {
            search: "pu".to_string(),
            ..ExerciseFilter::default()
        };
        assert!(browser.search(filter).await.unwrap());
        assert_eq!(
            browser
                .items()
                .iter()
                .map(|e| e.title.to_string())
                .collect::<Vec<_>>(),
            vec!["Pull Up", "Push Up"]
        );
        assert!(!browser.has_more());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_supersedes_earlier_search() {
        let browser = catalog(20, Duration::from_millis(500)).await;
        let first = ExerciseFilter {
            search: "p".to_string(),
            ..ExerciseFilter::default()
        };
        let second = ExerciseFilter {
            search: "pl".to_string(),
            ..ExerciseFilter::default()
        };
        let (first, second) =
            futures_util::future::join(browser.search(first), browser.search(second)).await;
        assert!(!first.unwrap());
        assert!(second.unwrap());
        assert_eq!(
            browser
                .items()
                .iter()
                .map(|e| e.title.to_string())
                .collect::<Vec<_>>(),
            vec!["Plank"]
        );
    }

    #[tokio::test]
    async fn test_debounce_without_quiet_period() {
        let debounce = Debounce::new(Duration::ZERO);
        assert!(debounce.settle().await);
        assert!(debounce.settle().await);
    }
}
