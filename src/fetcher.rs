//! Remote page fetcher.
//!
//! Wraps a [`CharacterQuery`] service with the supersession policy: every
//! call to [`PageFetcher::fetch`] gets a fresh [`RequestToken`], aborts the
//! previous in-flight task, and only the outcome carrying the latest token is
//! allowed to change [`FetchStatus`]. Outcomes are delivered over a channel so
//! the owner can process them in its own event order.

use crate::error::{FetchError, FetchResult};
use crate::perf::ScopedTimer;
use crate::types::{CharacterPage, CharacterRecord, PaginationInfo, QueryParameters};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The remote query endpoint.
///
/// Implementations own the transport; they receive the parameters verbatim
/// and must report failures as [`FetchError`] rather than panicking.
#[async_trait]
pub trait CharacterQuery: Send + Sync {
    async fn fetch_page(&self, params: &QueryParameters) -> FetchResult<CharacterPage>;
}

/// Monotonically increasing id of an issued fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// Status of the current request
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Arc<[CharacterRecord]>, PaginationInfo),
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, FetchStatus::Loaded(..) | FetchStatus::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Loaded(..) => "loaded",
            FetchStatus::Failed(_) => "failed",
        }
    }
}

/// What a finished request produced
#[derive(Debug)]
pub struct FetchOutcome {
    pub token: RequestToken,
    pub params: QueryParameters,
    pub result: FetchResult<CharacterPage>,
}

/// How an outcome was applied
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// A newer request was issued; the outcome was dropped
    Stale,
    Loaded(Arc<[CharacterRecord]>, PaginationInfo),
    Failed(FetchError),
}

pub struct PageFetcher {
    query: Arc<dyn CharacterQuery>,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
    last_token: u64,
    current: Option<(RequestToken, QueryParameters)>,
    status: FetchStatus,
    in_flight: Option<JoinHandle<()>>,
    slow_threshold: Duration,
}

impl PageFetcher {
    /// Create a fetcher and the receiver its outcomes arrive on.
    pub fn new(
        query: Arc<dyn CharacterQuery>,
        slow_threshold: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            query,
            outcomes: tx,
            last_token: 0,
            current: None,
            status: FetchStatus::Idle,
            in_flight: None,
            slow_threshold,
        };
        (fetcher, rx)
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Parameters of the latest issued request.
    pub fn current_params(&self) -> Option<&QueryParameters> {
        self.current.as_ref().map(|(_, params)| params)
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current.as_ref().map(|(token, _)| *token)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current_token() == Some(token)
    }

    /// Start a request for `params`, superseding any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&mut self, params: QueryParameters) -> RequestToken {
        self.abort_in_flight();

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.current = Some((token, params.clone()));
        self.status = FetchStatus::Loading;

        tracing::debug!(
            token = token.0,
            variables = %params.variables(),
            "Issuing fetch"
        );

        let query = Arc::clone(&self.query);
        let outcomes = self.outcomes.clone();
        let threshold_ms = self.slow_threshold.as_secs_f64() * 1000.0;
        self.in_flight = Some(tokio::spawn(async move {
            let timer = ScopedTimer::new("fetch_page", threshold_ms);
            let result = query.fetch_page(&params).await;
            tracing::debug!(
                token = token.0,
                ok = result.is_ok(),
                elapsed_ms = timer.elapsed_ms(),
                "Fetch finished"
            );
            drop(timer);
            // The owner may be gone already; nothing left to notify then.
            let _ = outcomes.send(FetchOutcome {
                token,
                params,
                result,
            });
        }));

        token
    }

    /// Apply a finished request. Outcomes for superseded tokens are dropped
    /// and leave the status untouched.
    pub fn resolve(&mut self, outcome: FetchOutcome) -> Resolution {
        if !self.is_current(outcome.token) {
            tracing::trace!(
                token = outcome.token.0,
                current = ?self.current_token().map(|t| t.0),
                "Discarding stale fetch result"
            );
            return Resolution::Stale;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(page) => {
                let records: Arc<[CharacterRecord]> = page.items.into();
                self.status = FetchStatus::Loaded(Arc::clone(&records), page.pagination_info);
                Resolution::Loaded(records, page.pagination_info)
            }
            Err(e) => {
                tracing::warn!(token = outcome.token.0, error = %e, "Fetch failed");
                self.status = FetchStatus::Failed(e.clone());
                Resolution::Failed(e)
            }
        }
    }

    /// Stop caring about the in-flight request, if any. The status stays as
    /// it is; a later `fetch` starts over.
    pub fn cancel(&mut self) {
        self.abort_in_flight();
        self.current = None;
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for PageFetcher {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
