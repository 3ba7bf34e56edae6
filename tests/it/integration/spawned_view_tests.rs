//! Tests against a spawned view: keystrokes go through the debounce task and
//! state is observed through published snapshots only.
//!
//! The clock is paused, so debounce periods elapse as soon as every task is
//! idle.

use crate::helpers::{ScriptedQuery, answer_next, characters, controller};
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_typing_commits_once_after_quiet_period() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let view = controller(query, dir.path()).spawn();

    answer_next(&mut requests, characters("Hero", 50), 10).await;
    view.wait_for(|s| s.row_count() == 50).await.unwrap();

    let typed_at = Instant::now();
    view.type_filter("M");
    view.type_filter("Mu");
    view.type_filter("Mulan");

    let request = requests.recv().await.unwrap();
    assert!(typed_at.elapsed() >= Duration::from_millis(300));
    assert_eq!(request.params.filter_name(), Some("Mulan"));
    assert_eq!(request.params.page, 1);
    request.respond_with(characters("Mulan", 3), 1);

    let snapshot = view
        .wait_for(|s| !s.is_loading() && s.row_count() == 3)
        .await
        .unwrap();
    assert_eq!(snapshot.paginator.total_pages(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(requests.try_recv().is_err());

    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_submit_skips_the_quiet_period() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let view = controller(query, dir.path()).spawn();
    answer_next(&mut requests, characters("Hero", 50), 10).await;

    let submitted_at = Instant::now();
    view.type_filter("El");
    view.submit_filter("Elsa");

    let request = requests.recv().await.unwrap();
    assert!(submitted_at.elapsed() < Duration::from_millis(300));
    assert_eq!(request.params.filter_name(), Some("Elsa"));

    // The buffered "El" was dropped by the submit.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(requests.try_recv().is_err());

    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_repeated_value_does_not_refetch() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let view = controller(query, dir.path()).spawn();
    answer_next(&mut requests, characters("Hero", 50), 10).await;

    view.type_filter("Belle");
    answer_next(&mut requests, characters("Belle", 1), 1).await;
    view.wait_for(|s| s.row_count() == 1).await.unwrap();

    view.type_filter("Bell");
    view.type_filter("Belle");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(requests.try_recv().is_err());
    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_handle_commands_reach_the_view() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let view = controller(query, dir.path()).spawn();
    answer_next(&mut requests, characters("Hero", 50), 10).await;
    view.wait_for(|s| s.paginator.total_pages() == 10).await.unwrap();

    view.request_page(2);
    let params = answer_next(&mut requests, characters("Page2", 50), 10).await;
    assert_eq!(params.page, 2);
    view.wait_for(|s| s.paginator.current_page() == 2 && !s.is_loading())
        .await
        .unwrap();

    view.request_page_size(20);
    let params = answer_next(&mut requests, characters("Hero", 20), 25).await;
    assert_eq!((params.page, params.page_size), (1, 20));

    view.set_page_size_options(vec![20, 40]);
    let snapshot = view
        .wait_for(|s| s.paginator.page_size_options() == [20, 40])
        .await
        .unwrap();
    assert_eq!(snapshot.paginator.page_size(), 20);

    view.export();
    view.refresh();
    answer_next(&mut requests, characters("Hero", 20), 25).await;
    view.wait_for(|s| !s.is_loading()).await.unwrap();
    assert!(dir.path().join("chart.csv").exists());

    view.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_releases_pending_fetch() {
    let dir = tempdir().unwrap();
    let (query, mut requests) = ScriptedQuery::new();
    let view = controller(query, dir.path()).spawn();

    let mut pending = requests.recv().await.unwrap();
    view.shutdown().await;

    tokio::time::timeout(Duration::from_secs(5), pending.abandoned())
        .await
        .expect("in-flight fetch outlived the view");
}
