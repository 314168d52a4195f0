//! Property-based tests for the pagination state machine using proptest.
//!
//! These drive [`PagerCore`] directly, playing the role of the driver, so
//! every interleaving is deterministic.

use aerodex::{FetchError, PagerCore, Resolution};
use proptest::prelude::*;

/// Run the fetch the core asks for, resolving it with `outcome`.
fn fetch(core: &mut PagerCore<u16>, outcome: Result<Vec<u16>, FetchError>) -> Option<Resolution> {
    let ticket = core.poll_fetch()?;
    Some(core.resolve(ticket, outcome))
}

// =============================================================================
// Sequential Paging
// =============================================================================

proptest! {
    /// Loading every page of a query yields the pages concatenated in order
    #[test]
    fn pages_concatenate_in_order(
        pages in prop::collection::vec(prop::collection::vec(any::<u16>(), 1..8), 0..6)
    ) {
        let mut core = PagerCore::new(0, vec![9999]);
        core.start_new_query();

        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                prop_assert!(core.load_next_page());
            }
            let resolution = fetch(&mut core, Ok(page.clone()));
            prop_assert_eq!(resolution, Some(Resolution::Loaded { page: index, end: false }));
        }
        if !pages.is_empty() {
            prop_assert!(core.load_next_page());
        }
        let resolution = fetch(&mut core, Ok(vec![]));
        prop_assert_eq!(resolution, Some(Resolution::Loaded { page: pages.len(), end: true }));

        let expected: Vec<u16> = pages.concat();
        prop_assert_eq!(core.items(), expected.as_slice());
        prop_assert!(core.last_page_loaded());
        prop_assert!(!core.is_loading());
        prop_assert!(!core.load_next_page(), "no request after the last page");
    }

    /// A new query whose first page is empty never keeps earlier items
    #[test]
    fn empty_first_page_clears_items(
        seed in prop::collection::vec(any::<u16>(), 0..16)
    ) {
        let mut core = PagerCore::new(0, seed);
        core.start_new_query();
        fetch(&mut core, Ok(vec![]));

        prop_assert!(core.items().is_empty());
        prop_assert!(core.last_page_loaded());
    }

    /// A failure keeps the items and the next request retries the same page
    #[test]
    fn failure_then_retry_requests_same_page(
        loaded in 1usize..5,
        status in 400u16..600
    ) {
        let mut core = PagerCore::new(0, vec![0]);
        for _ in 0..loaded {
            core.load_next_page();
            fetch(&mut core, Ok(vec![1]));
        }
        let before = core.items().to_vec();

        prop_assert!(core.load_next_page());
        let failed = core.poll_fetch().unwrap();
        core.resolve(failed, Err(FetchError::Status { status }));
        prop_assert!(core.has_error());
        prop_assert_eq!(core.items(), before.as_slice());

        prop_assert!(core.load_next_page());
        let retry = core.poll_fetch().unwrap();
        prop_assert_eq!(retry.page(), failed.page());
        prop_assert!(!core.has_error());
    }
}

// =============================================================================
// Arbitrary Interleavings
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    StartNewQuery,
    LoadNextPage,
    Succeed(Vec<u16>),
    Fail,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::StartNewQuery),
        Just(Step::LoadNextPage),
        prop::collection::vec(any::<u16>(), 0..4).prop_map(Step::Succeed),
        Just(Step::Fail),
    ]
}

proptest! {
    /// Whatever the user does and however fetches resolve, at most one fetch
    /// is outstanding and the flags stay consistent
    #[test]
    fn flags_stay_consistent(steps in prop::collection::vec(step(), 0..40)) {
        let mut core: PagerCore<u16> = PagerCore::default();
        let mut outstanding = None;

        for step in steps {
            match step {
                Step::StartNewQuery => core.start_new_query(),
                Step::LoadNextPage => {
                    core.load_next_page();
                },
                Step::Succeed(page) => {
                    if let Some(ticket) = outstanding.take() {
                        core.resolve(ticket, Ok(page));
                    }
                },
                Step::Fail => {
                    if let Some(ticket) = outstanding.take() {
                        core.resolve(ticket, Err(FetchError::transport("reset")));
                    }
                },
            }
            if let Some(ticket) = core.poll_fetch() {
                prop_assert!(outstanding.is_none(), "second fetch dispatched");
                outstanding = Some(ticket);
            }

            prop_assert_eq!(core.in_flight(), outstanding);
            prop_assert!(!(core.is_loading() && core.has_error()));
            prop_assert!(!(core.is_loading() && core.last_page_loaded()));
            if !core.is_loading() {
                prop_assert!(outstanding.is_none(), "settled with a fetch outstanding");
            }
        }
    }
}
