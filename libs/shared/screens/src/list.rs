use shared_models::{Page, PageRequest, PortalError};

/// Where a collection screen is in its lifecycle. There is no terminal
/// state; `Error` screens reload like any other.
#[derive(Debug)]
pub enum ListPhase<T> {
    Idle,
    Loading,
    Loaded(LoadedPage<T>),
    Error { message: String },
}

/// The last page envelope the screen accepted. Pager arithmetic reads these
/// fields; nothing in the portal recomputes them.
#[derive(Debug)]
pub struct LoadedPage<T> {
    pub rows: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

/// Issued by [`ListController::begin_reload`]. Carries the page and filter
/// snapshot the request must be built from, and the sequence number that
/// decides whether the response still matters when it lands.
#[derive(Debug)]
pub struct ReloadTicket<F> {
    seq: u64,
    pub page: PageRequest,
    pub filter: F,
}

/// What [`ListController::apply`] did with a response.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// A newer reload superseded this one; the response was dropped whole,
    /// success or failure alike.
    Stale,
}

/// The paginated-collection state machine shared by every list screen:
/// zero-based paging, a filter snapshot per request, and last-response-wins
/// sequencing for overlapping reloads.
#[derive(Debug)]
pub struct ListController<T, F> {
    phase: ListPhase<T>,
    page: PageRequest,
    filter: F,
    seq: u64,
}

impl<T, F: Clone> ListController<T, F> {
    pub fn new(filter: F, page_size: u32) -> Self {
        Self {
            phase: ListPhase::Idle,
            page: PageRequest::first(page_size),
            filter,
            seq: 0,
        }
    }

    pub fn phase(&self) -> &ListPhase<T> {
        &self.phase
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ListPhase::Loading)
    }

    pub fn rows(&self) -> &[T] {
        match &self.phase {
            ListPhase::Loaded(loaded) => &loaded.rows,
            _ => &[],
        }
    }

    pub fn loaded(&self) -> Option<&LoadedPage<T>> {
        match &self.phase {
            ListPhase::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    /// Enters `Loading` and snapshots what the request must ask for. Any
    /// ticket issued earlier becomes stale from this moment.
    pub fn begin_reload(&mut self) -> ReloadTicket<F> {
        self.seq += 1;
        self.phase = ListPhase::Loading;
        ReloadTicket {
            seq: self.seq,
            page: self.page,
            filter: self.filter.clone(),
        }
    }

    /// Feeds a response back in. Responses for superseded tickets are
    /// discarded without touching the phase.
    pub fn apply(&mut self, ticket: ReloadTicket<F>, result: Result<Page<T>, PortalError>) -> Applied {
        if ticket.seq != self.seq {
            return Applied::Stale;
        }

        match result {
            Ok(page) => {
                // The envelope is authoritative for pager state, including
                // when the server caps the requested size.
                self.page = PageRequest { number: page.number, size: page.size };
                self.phase = ListPhase::Loaded(LoadedPage {
                    rows: page.content,
                    total_elements: page.total_elements,
                    total_pages: page.total_pages,
                    first: page.first,
                    last: page.last,
                });
            }
            Err(err) => {
                self.phase = ListPhase::Error { message: err.notice_text() };
            }
        }

        Applied::Updated
    }

    /// Replaces the filter and rewinds to the first page.
    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.page.number = 0;
    }

    /// Changes the page size and rewinds to the first page.
    pub fn set_page_size(&mut self, size: u32) {
        if size > 0 {
            self.page.size = size;
            self.page.number = 0;
        }
    }

    /// Moves forward one page, bounded by the last accepted envelope.
    pub fn next_page(&mut self) -> bool {
        match &self.phase {
            ListPhase::Loaded(loaded) if !loaded.last => {
                self.page.number += 1;
                true
            }
            _ => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page.number > 0 {
            self.page.number -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to a page the last envelope says exists.
    pub fn set_page(&mut self, number: u32) -> bool {
        let in_range = match &self.phase {
            ListPhase::Loaded(loaded) => number < loaded.total_pages,
            _ => number == 0,
        };
        if in_range {
            self.page.number = number;
        }
        in_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn page_of(rows: Vec<u32>, total: u64, number: u32, size: u32) -> Page<u32> {
        let total_pages = ((total + size as u64 - 1) / size as u64) as u32;
        Page {
            total_elements: total,
            total_pages,
            size,
            number,
            first: number == 0,
            last: total_pages == 0 || number + 1 >= total_pages,
            content: rows,
        }
    }

    #[test]
    fn load_cycle_reaches_loaded() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        assert_matches!(list.phase(), ListPhase::Idle);

        let ticket = list.begin_reload();
        assert!(list.is_loading());
        assert_eq!(ticket.page, PageRequest::first(10));

        let applied = list.apply(ticket, Ok(page_of(vec![1, 2, 3], 3, 0, 10)));
        assert_eq!(applied, Applied::Updated);
        assert_eq!(list.rows(), &[1, 2, 3]);
    }

    #[test]
    fn failed_load_enters_error_with_no_rows() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        let ticket = list.begin_reload();
        list.apply(ticket, Err(PortalError::Transport("refused".to_string())));

        assert_matches!(list.phase(), ListPhase::Error { .. });
        assert!(list.rows().is_empty());
    }

    #[test]
    fn error_state_can_reload() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        let ticket = list.begin_reload();
        list.apply(ticket, Err(PortalError::Transport("refused".to_string())));

        let retry = list.begin_reload();
        assert!(list.is_loading());
        list.apply(retry, Ok(page_of(vec![7], 1, 0, 10)));
        assert_eq!(list.rows(), &[7]);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);

        let first = list.begin_reload();
        let second = list.begin_reload();

        // The second request resolves first and wins.
        assert_eq!(list.apply(second, Ok(page_of(vec![2], 1, 0, 10))), Applied::Updated);
        // The first request lands late; its payload must not clobber anything.
        assert_eq!(list.apply(first, Ok(page_of(vec![1], 1, 0, 10))), Applied::Stale);

        assert_eq!(list.rows(), &[2]);
    }

    #[test]
    fn stale_failure_does_not_disturb_loaded_state() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);

        let first = list.begin_reload();
        let second = list.begin_reload();

        list.apply(second, Ok(page_of(vec![5], 1, 0, 10)));
        let applied = list.apply(first, Err(PortalError::Transport("late timeout".to_string())));

        assert_eq!(applied, Applied::Stale);
        assert_eq!(list.rows(), &[5]);
    }

    #[test]
    fn filter_change_rewinds_to_page_zero() {
        let mut list: ListController<u32, String> = ListController::new(String::new(), 10);
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of(vec![1], 25, 2, 10)));
        assert_eq!(list.page().number, 2);

        list.set_filter("smith".to_string());
        assert_eq!(list.page().number, 0);
        assert_eq!(list.filter(), "smith");
    }

    #[test]
    fn size_change_rewinds_to_page_zero() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of(vec![1], 25, 2, 10)));

        list.set_page_size(25);
        assert_eq!(list.page(), PageRequest { number: 0, size: 25 });
    }

    #[test]
    fn pager_bounds_follow_the_envelope() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);

        // 25 elements at size 10: pages 0, 1, 2.
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of((0..10).collect(), 25, 0, 10)));

        assert!(list.next_page());
        assert_eq!(list.page().number, 1);
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of((10..20).collect(), 25, 1, 10)));

        assert!(list.next_page());
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of((20..25).collect(), 25, 2, 10)));

        // The last page refuses to advance further.
        assert!(!list.next_page());
        assert_eq!(list.page().number, 2);

        assert!(list.set_page(0));
        assert!(!list.set_page(3));
    }

    #[test]
    fn prev_page_stops_at_zero() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        assert!(!list.prev_page());
        assert_eq!(list.page().number, 0);
    }

    #[test]
    fn reload_snapshots_the_current_filter() {
        let mut list: ListController<u32, String> = ListController::new("old".to_string(), 10);
        let ticket = list.begin_reload();
        assert_eq!(ticket.filter, "old");

        // Filter edits after the snapshot do not affect the in-flight request.
        list.set_filter("new".to_string());
        let newer = list.begin_reload();
        assert_eq!(newer.filter, "new");
        assert_eq!(newer.page.number, 0);

        // And the older ticket is now stale.
        assert_eq!(list.apply(ticket, Ok(page_of(vec![], 0, 0, 10))), Applied::Stale);
    }

    #[test]
    fn empty_result_set_is_loaded_not_error() {
        let mut list: ListController<u32, ()> = ListController::new((), 10);
        let ticket = list.begin_reload();
        list.apply(ticket, Ok(page_of(vec![], 0, 0, 10)));

        assert_matches!(list.phase(), ListPhase::Loaded(loaded) => {
            assert_eq!(loaded.total_elements, 0);
            assert!(loaded.last);
        });
        assert!(list.rows().is_empty());
    }
}
