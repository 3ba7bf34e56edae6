//! View controller: the single place where filter, page and page size become a
//! query, and where fetch results become the table and chart.
//!
//! The controller is an actor. One task owns all view state and handles one
//! [`ViewEvent`] at a time, issuing the follow-up fetch before looking at the
//! next event. Fetch outcomes come back as events too, and the fetcher's
//! request tokens decide which of them may still change the view. After every
//! event a fresh [`ViewSnapshot`] is published on a `watch` channel.
//!
//! ## Rules
//!
//! - A committed filter resets to page 1.
//! - A page size change resets to page 1.
//! - The last issued query wins; stale outcomes are dropped.
//! - A failed fetch keeps the previous rows on screen.
//! - Sorting reorders loaded rows only; it never refetches.

use crate::constants::FIRST_PAGE;
use crate::data::{DisplayRow, Projection, TableSort, project};
use crate::error::{ExportError, FetchError};
use crate::fetcher::{
    CharacterQuery, FetchOutcome, FetchStatus, PageFetcher, RequestToken, Resolution,
};
use crate::filter::{DebouncedFilter, FilterInput};
use crate::paginator::{PaginatorEvent, PaginatorState};
use crate::services::ViewServices;
use crate::settings::ViewSettings;
use crate::types::{CharacterRecord, QueryParameters};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Everything that can happen to a view
#[derive(Debug)]
pub enum ViewEvent {
    /// The debounced filter committed a value
    FilterCommitted(String),
    /// The user asked for a page
    PageRequested(u32),
    /// The user picked a page size
    PageSizeRequested(u32),
    /// New page size options (settings reload)
    PageSizeOptionsChanged(Vec<u32>),
    /// A fetch finished
    FetchResolved(FetchOutcome),
    /// The user changed the table sort
    SortChanged(TableSort),
    /// The user opened a row
    DetailRequested(String),
    /// The user asked for a spreadsheet
    ExportRequested,
    /// Re-issue the current query, even if it is unchanged
    Refresh,
    Shutdown,
}

/// Published, immutable view state
#[derive(Clone, Debug)]
pub struct ViewSnapshot {
    /// Last issued query
    pub params: Option<QueryParameters>,
    pub status: FetchStatus,
    /// Projection of the last accepted batch, in server order
    pub projection: Arc<Projection>,
    /// Display order of `projection.rows`
    pub row_order: Arc<[usize]>,
    pub sort: TableSort,
    pub paginator: PaginatorState,
    /// Error of the last request, cleared by the next successful one
    pub error: Option<FetchError>,
    /// When the current request started, while it is loading
    pub loading_since: Option<Instant>,
    /// Last sort announcement
    pub announcement: Option<String>,
}

impl ViewSnapshot {
    /// Rows in display (sorted) order.
    pub fn rows(&self) -> impl Iterator<Item = &DisplayRow> + '_ {
        self.row_order
            .iter()
            .filter_map(|&i| self.projection.rows.get(i))
    }

    pub fn row_count(&self) -> usize {
        self.projection.rows.len()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Whether the current request has been loading for longer than `threshold`.
    pub fn is_slow(&self, now: Instant, threshold: Duration) -> bool {
        match self.loading_since {
            Some(since) if self.is_loading() => now.saturating_duration_since(since) > threshold,
            _ => false,
        }
    }

    /// Paginator label, see [`crate::paginator::range_display_text`].
    pub fn range_label(&self) -> String {
        self.paginator.range_label(self.paginator.total_pages())
    }
}

pub struct ViewController {
    settings: ViewSettings,
    paginator: PaginatorState,
    fetcher: PageFetcher,
    outcomes: Option<mpsc::UnboundedReceiver<FetchOutcome>>,
    services: ViewServices,
    page: u32,
    page_size: u32,
    filter: Option<String>,
    records: Arc<[CharacterRecord]>,
    projection: Arc<Projection>,
    sort: TableSort,
    row_order: Arc<[usize]>,
    error: Option<FetchError>,
    loading_since: Option<Instant>,
    announcement: Option<String>,
    published: watch::Sender<ViewSnapshot>,
}

impl ViewController {
    pub fn new(
        settings: ViewSettings,
        query: Arc<dyn CharacterQuery>,
        services: ViewServices,
    ) -> Self {
        let paginator =
            PaginatorState::new(settings.initial_page_size, settings.page_size_options.clone())
                .with_bound(settings.page_bound);
        let (fetcher, outcomes) = PageFetcher::new(query, settings.slow_fetch_threshold());
        let page_size = paginator.page_size();
        let empty: Arc<[usize]> = Arc::from(Vec::new());

        let initial = ViewSnapshot {
            params: None,
            status: FetchStatus::Idle,
            projection: Arc::new(Projection::default()),
            row_order: Arc::clone(&empty),
            sort: TableSort::default(),
            paginator: paginator.clone(),
            error: None,
            loading_since: None,
            announcement: None,
        };
        let (published, _) = watch::channel(initial);

        Self {
            settings,
            paginator,
            fetcher,
            outcomes: Some(outcomes),
            services,
            page: FIRST_PAGE,
            page_size,
            filter: None,
            records: Arc::from(Vec::new()),
            projection: Arc::new(Projection::default()),
            sort: TableSort::default(),
            row_order: empty,
            error: None,
            loading_since: None,
            announcement: None,
            published,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.published.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            params: self.fetcher.current_params().cloned(),
            status: self.fetcher.status().clone(),
            projection: Arc::clone(&self.projection),
            row_order: Arc::clone(&self.row_order),
            sort: self.sort,
            paginator: self.paginator.clone(),
            error: self.error.clone(),
            loading_since: self.loading_since,
            announcement: self.announcement.clone(),
        }
    }

    pub fn paginator(&self) -> &PaginatorState {
        &self.paginator
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    /// The query the current state describes.
    pub fn current_query(&self) -> QueryParameters {
        QueryParameters::new(self.page, self.page_size).with_filter(self.filter.as_deref())
    }

    /// Issue the initial fetch.
    pub fn start(&mut self) {
        tracing::info!(
            page_size = self.page_size,
            debounce_ms = self.settings.debounce_ms,
            "Starting character view"
        );
        self.issue(false);
        self.publish();
    }

    /// Handle one event and publish the resulting snapshot. Returns false once
    /// the view should stop.
    pub fn handle(&mut self, event: ViewEvent) -> bool {
        match event {
            ViewEvent::FilterCommitted(value) => self.on_filter(value),
            ViewEvent::PageRequested(n) => {
                if let Some(event) = self.paginator.request_page_change(n) {
                    self.on_paginator_event(event);
                } else {
                    tracing::trace!(page = n, "Ignoring out-of-range page request");
                }
            }
            ViewEvent::PageSizeRequested(size) => {
                if size == 0 {
                    tracing::trace!("Ignoring page size 0");
                } else {
                    let event = self.paginator.request_page_size_change(size);
                    self.on_paginator_event(event);
                }
            }
            ViewEvent::PageSizeOptionsChanged(options) => {
                self.paginator.set_page_size_options(options);
            }
            ViewEvent::FetchResolved(outcome) => self.on_fetch_resolved(outcome),
            ViewEvent::SortChanged(sort) => {
                self.set_sort(sort);
            }
            ViewEvent::DetailRequested(id) => {
                self.open_detail(&id);
            }
            ViewEvent::ExportRequested => {
                if let Err(e) = self.export() {
                    tracing::error!("Export failed: {}", e);
                }
            }
            ViewEvent::Refresh => {
                self.issue(true);
            }
            ViewEvent::Shutdown => {
                self.teardown();
                self.publish();
                return false;
            }
        }
        self.publish();
        true
    }

    fn on_filter(&mut self, value: String) {
        let filter = (!value.is_empty()).then_some(value);
        tracing::debug!(filter = ?filter, "Filter changed");
        self.filter = filter;
        self.page = FIRST_PAGE;
        self.paginator.reset_page();
        self.issue(false);
    }

    fn on_paginator_event(&mut self, event: PaginatorEvent) {
        match event {
            PaginatorEvent::PageChanged(page) => {
                self.page = page;
            }
            PaginatorEvent::PageSizeChanged(size) => {
                self.page_size = size;
                self.page = FIRST_PAGE;
                self.paginator.reset_page();
            }
        }
        self.issue(false);
    }

    fn on_fetch_resolved(&mut self, outcome: FetchOutcome) {
        match self.fetcher.resolve(outcome) {
            Resolution::Stale => {}
            Resolution::Loaded(records, info) => {
                tracing::debug!(
                    records = records.len(),
                    total_pages = info.total_pages,
                    "Batch accepted"
                );
                let projection = project(&records);
                self.row_order = self.sort.sorted_indices(&projection.rows).into();
                self.projection = Arc::new(projection);
                self.records = records;
                self.loading_since = None;
                self.error = None;
                self.sync_total_pages(info.total_pages);
            }
            Resolution::Failed(e) => {
                // Rows of the last good batch stay visible.
                self.loading_since = None;
                self.error = Some(e);
            }
        }
    }

    fn sync_total_pages(&mut self, total_pages: u32) {
        if total_pages == self.paginator.total_pages() {
            return;
        }
        let moved = self.paginator.set_total_pages(total_pages);
        if moved {
            tracing::debug!(total_pages, "Page count changed, returning to the first page");
            self.page = FIRST_PAGE;
            self.issue(false);
        }
    }

    /// Start a fetch for the current query. Unless `force` is set, nothing is
    /// issued when the same query is already loading or loaded.
    fn issue(&mut self, force: bool) -> Option<RequestToken> {
        let params = self.current_query();
        let same_query = self.fetcher.current_params() == Some(&params);
        let settled_or_pending = matches!(
            self.fetcher.status(),
            FetchStatus::Loading | FetchStatus::Loaded(..)
        );
        if !force && same_query && settled_or_pending {
            tracing::trace!("Query unchanged, not refetching");
            return None;
        }
        self.loading_since = Some(Instant::now());
        Some(self.fetcher.fetch(params))
    }

    /// Change the client-side sort and return the announcement for it.
    pub fn set_sort(&mut self, sort: TableSort) -> String {
        self.sort = sort;
        self.row_order = sort.sorted_indices(&self.projection.rows).into();
        let message = self.services.announcer.announce(sort.direction);
        self.announcement = Some(message.clone());
        message
    }

    /// Hand the loaded record with `id` to the detail presenter.
    pub fn open_detail(&self, id: &str) -> bool {
        match self.records.iter().find(|r| r.id == id) {
            Some(record) => {
                self.services.detail.present(record);
                true
            }
            None => {
                tracing::debug!(id, "No loaded character with this id");
                false
            }
        }
    }

    /// Export the current chart through the configured exporter.
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        self.services.exporter.export(&self.projection)
    }

    /// Wait for the next fetch outcome and handle it. Returns false when no
    /// more outcomes can arrive (the receiver was moved into [`Self::run`]).
    pub async fn pump_fetch(&mut self) -> bool {
        let Some(outcomes) = self.outcomes.as_mut() else {
            return false;
        };
        match outcomes.recv().await {
            Some(outcome) => {
                self.handle(ViewEvent::FetchResolved(outcome));
                true
            }
            None => false,
        }
    }

    /// Process events until `Shutdown` or until every sender is gone.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<ViewEvent>) {
        let Some(mut outcomes) = self.outcomes.take() else {
            tracing::error!("View controller started twice");
            return;
        };

        loop {
            let keep_running = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => false,
                },
                Some(outcome) = outcomes.recv() => {
                    self.handle(ViewEvent::FetchResolved(outcome))
                }
            };
            if !keep_running {
                break;
            }
        }

        self.teardown();
        tracing::debug!("View controller stopped");
    }

    /// Issue the initial fetch and run on a new task, with a debounced filter
    /// wired to it.
    pub fn spawn(mut self) -> ViewHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (filter, mut committed, debounce_task) =
            DebouncedFilter::spawn(self.settings.debounce());

        let forward_tx = events_tx.clone();
        let forward_task = tokio::spawn(async move {
            while let Some(value) = committed.next().await {
                if forward_tx.send(ViewEvent::FilterCommitted(value)).is_err() {
                    break;
                }
            }
        });

        let snapshots = self.subscribe();
        self.start();
        let task = tokio::spawn(self.run(events_rx));

        ViewHandle {
            events: events_tx,
            filter,
            snapshots,
            task,
            filter_tasks: vec![debounce_task, forward_task],
        }
    }

    fn teardown(&mut self) {
        self.fetcher.cancel();
        self.loading_since = None;
    }

    fn publish(&self) {
        self.published.send_replace(self.snapshot());
    }
}

/// Handle to a running view
pub struct ViewHandle {
    events: mpsc::UnboundedSender<ViewEvent>,
    filter: FilterInput,
    snapshots: watch::Receiver<ViewSnapshot>,
    task: JoinHandle<()>,
    filter_tasks: Vec<JoinHandle<()>>,
}

impl ViewHandle {
    /// Search box keystroke (debounced).
    pub fn type_filter(&self, value: impl Into<String>) {
        self.filter.push(value);
    }

    /// Search box enter key (immediate).
    pub fn submit_filter(&self, value: impl Into<String>) {
        self.filter.submit(value);
    }

    pub fn request_page(&self, page: u32) {
        self.send(ViewEvent::PageRequested(page));
    }

    pub fn request_page_size(&self, size: u32) {
        self.send(ViewEvent::PageSizeRequested(size));
    }

    pub fn set_page_size_options(&self, options: Vec<u32>) {
        self.send(ViewEvent::PageSizeOptionsChanged(options));
    }

    pub fn sort(&self, sort: TableSort) {
        self.send(ViewEvent::SortChanged(sort));
    }

    pub fn open_detail(&self, id: impl Into<String>) {
        self.send(ViewEvent::DetailRequested(id.into()));
    }

    pub fn export(&self) {
        self.send(ViewEvent::ExportRequested);
    }

    pub fn refresh(&self) {
        self.send(ViewEvent::Refresh);
    }

    /// Latest published snapshot.
    pub fn current(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`. `None` if the
    /// view stopped first.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Option<ViewSnapshot>
    where
        F: FnMut(&ViewSnapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx.wait_for(|s| predicate(s)).await.ok()?.clone();
        Some(snapshot)
    }

    /// Stop the view and release every task and subscription it holds.
    pub async fn shutdown(self) {
        self.send(ViewEvent::Shutdown);
        for task in &self.filter_tasks {
            task.abort();
        }
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                tracing::error!("View task failed: {}", e);
            }
        }
    }

    fn send(&self, event: ViewEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("View already stopped");
        }
    }
}
