//! Debounced filter source for the search box.
//!
//! [`Debouncer`] is the timer-free core: it buffers the latest keystroke value,
//! releases it once the quiet period has elapsed and suppresses values equal to
//! the last one released. [`DebouncedFilter::spawn`] drives it from a tokio
//! task and hands committed values out through a [`FilterStream`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Timer-free debounce + distinct-until-changed buffer
#[derive(Clone, Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Buffer a keystroke value, restarting the quiet period.
    pub fn push(&mut self, value: String, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Release the pending value if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.pending.take() {
            Some((value, due)) if due <= now => self.commit(value),
            still_waiting => {
                self.pending = still_waiting;
                None
            }
        }
    }

    /// Commit `value` immediately. Any buffered keystroke is dropped.
    pub fn submit(&mut self, value: String) -> Option<String> {
        self.pending = None;
        self.commit(value)
    }

    /// Forget both the pending value and the last emission.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_emitted = None;
    }

    fn commit(&mut self, value: String) -> Option<String> {
        if self.last_emitted.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}

#[derive(Debug)]
enum FilterSignal {
    Keystroke(String),
    Submit(String),
    Reset,
}

/// Write side of a debounced filter
#[derive(Clone, Debug)]
pub struct FilterInput {
    tx: mpsc::UnboundedSender<FilterSignal>,
}

impl FilterInput {
    /// Push the search box value after a keystroke.
    pub fn push(&self, value: impl Into<String>) {
        let _ = self.tx.send(FilterSignal::Keystroke(value.into()));
    }

    /// Commit the value now (enter key).
    pub fn submit(&self, value: impl Into<String>) {
        let _ = self.tx.send(FilterSignal::Submit(value.into()));
    }

    /// Start over: the next value is emitted even if it repeats the last one.
    pub fn reset(&self) {
        let _ = self.tx.send(FilterSignal::Reset);
    }
}

/// Read side of a debounced filter: committed values only
#[derive(Debug)]
pub struct FilterStream {
    rx: mpsc::UnboundedReceiver<String>,
}

impl FilterStream {
    /// Next committed value. `None` once the input side is gone.
    pub async fn next(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Spawner for the debounce task
pub struct DebouncedFilter;

impl DebouncedFilter {
    /// Spawn the debounce task. It runs until every [`FilterInput`] is dropped
    /// or the returned handle is aborted.
    pub fn spawn(quiet: Duration) -> (FilterInput, FilterStream, JoinHandle<()>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce(Debouncer::new(quiet), input_rx, output_tx));
        (
            FilterInput { tx: input_tx },
            FilterStream { rx: output_rx },
            task,
        )
    }
}

async fn run_debounce(
    mut debouncer: Debouncer,
    mut input: mpsc::UnboundedReceiver<FilterSignal>,
    output: mpsc::UnboundedSender<String>,
) {
    loop {
        let deadline = debouncer.deadline();
        // Disabled branches are still constructed, so give the sleep a valid instant.
        let sleep_until = deadline.unwrap_or_else(|| Instant::now() + debouncer.quiet_period());

        let committed = tokio::select! {
            signal = input.recv() => match signal {
                Some(FilterSignal::Keystroke(value)) => {
                    debouncer.push(value, Instant::now());
                    None
                }
                Some(FilterSignal::Submit(value)) => debouncer.submit(value),
                Some(FilterSignal::Reset) => {
                    debouncer.reset();
                    None
                }
                None => break,
            },
            _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                debouncer.poll(Instant::now())
            }
        };

        if let Some(value) = committed {
            tracing::debug!(filter = %value, "Filter committed");
            if output.send(value).is_err() {
                break;
            }
        }
    }
    tracing::trace!("Filter task finished");
}
