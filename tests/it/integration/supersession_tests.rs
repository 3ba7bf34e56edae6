//! Last-issued-query-wins tests.
//!
//! Responses arriving for superseded queries must never reach the view, no
//! matter in which order the service answers.

use crate::helpers::{ScriptedQuery, answer_next, characters, controller, page_of};
use castboard::controller::ViewEvent;
use castboard::fetcher::{FetchOutcome, RequestToken};
use castboard::types::QueryParameters;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn test_newer_page_request_wins() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let mut view = controller(query, dir.path());
    view.start();
    answer_next(&mut requests, characters("Hero", 50), 10).await;
    view.pump_fetch().await;

    // Page 6 is requested and still in flight when page 3 is requested.
    view.handle(ViewEvent::PageRequested(6));
    let mut slow = requests.recv().await.unwrap();
    assert_eq!(slow.params.page, 6);

    view.handle(ViewEvent::PageRequested(3));
    let fast = requests.recv().await.unwrap();
    assert_eq!(fast.params.page, 3);

    tokio::time::timeout(Duration::from_secs(5), slow.abandoned())
        .await
        .expect("superseded fetch was not cancelled");

    fast.respond_with(characters("Page3", 50), 10);
    view.pump_fetch().await;
    // Too late: nobody is listening for page 6 anymore.
    slow.respond_with(characters("Page6", 50), 10);

    let snapshot = view.snapshot();
    assert_eq!(snapshot.paginator.current_page(), 3);
    assert_eq!(snapshot.params, Some(QueryParameters::new(3, 50)));
    assert!(snapshot.rows().all(|r| r.name.starts_with("Page3")));
}

#[tokio::test]
async fn test_stale_outcome_leaves_view_untouched() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let mut view = controller(query, dir.path());
    view.start();
    answer_next(&mut requests, characters("Hero", 50), 10).await;
    view.pump_fetch().await;

    view.handle(ViewEvent::PageRequested(2));
    let _pending = requests.recv().await.unwrap();

    // An outcome for the very first request shows up after page 2 was issued.
    view.handle(ViewEvent::FetchResolved(FetchOutcome {
        token: RequestToken(1),
        params: QueryParameters::new(1, 50),
        result: Ok(page_of(characters("Stale", 5), 1, 1)),
    }));

    let snapshot = view.snapshot();
    assert!(snapshot.is_loading());
    assert_eq!(snapshot.row_count(), 50);
    assert_eq!(snapshot.paginator.total_pages(), 10);
    assert!(snapshot.rows().all(|r| r.name.starts_with("Hero")));
}

#[tokio::test]
async fn test_filter_supersedes_page_request() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let mut view = controller(query, dir.path());
    view.start();
    answer_next(&mut requests, characters("Hero", 50), 10).await;
    view.pump_fetch().await;

    view.handle(ViewEvent::PageRequested(5));
    let _page_five = requests.recv().await.unwrap();
    view.handle(ViewEvent::FilterCommitted("Gaston".into()));

    let params = answer_next(&mut requests, characters("Gaston", 1), 1).await;
    assert_eq!(params.page, 1);
    assert_eq!(params.filter_name(), Some("Gaston"));
    view.pump_fetch().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.row_count(), 1);
    assert_eq!(snapshot.paginator.current_page(), 1);
}
