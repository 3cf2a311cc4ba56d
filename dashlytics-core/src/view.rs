/**
 * DATA VIEW CONTROLLER - Per-view interactive state and fetch orchestration
 *
 * ROLE :
 * One generic controller serves every dashboard view. It owns the view's
 * limit / sort / page state, derives request parameters from it, triggers
 * the fetcher whenever those parameters change, and derives the rows to
 * display (sort, client truncation, pagination).
 *
 * STATES : Idle -> Loading -> Ready | Error
 *
 * RACES :
 * Every fetch carries a monotonically increasing sequence number. Only the
 * result of the most recently issued fetch is applied (last-write-wins); a
 * slow stale response is dropped instead of overwriting fresher data.
 *
 * SPLIT :
 * - `ViewState` : synchronous state machine, no I/O, fully testable
 * - `DataView`  : cloneable async handle pairing a `ViewState` with a `DataFetcher`
 */

use crate::error::FetchError;
use crate::fetcher::{DataFetcher, FetchOutcome};
use crate::params::{RequestParameters, SortOrder};
use crate::schema::ViewSchema;
use crate::state::{new_state, Shared};
use crate::transport::Transport;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What caused a fetch to be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Initial,
    Limit,
    SortField,
    SortOrder,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<F> {
    pub sequence: u64,
    pub parameters: RequestParameters<F>,
    pub trigger: Trigger,
}

/// Read-only view of a controller for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<R, F> {
    pub phase: Phase,
    pub display_rows: Vec<R>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows after sorting and truncation, before pagination.
    pub total_records: usize,
    pub parameters: RequestParameters<F>,
    pub last_error: Option<FetchError>,
}

pub struct ViewState<S: ViewSchema> {
    schema: Arc<S>,
    phase: Phase,
    parameters: RequestParameters<S::Field>,
    current_page: usize,
    records: Vec<S::Record>,
    latest_issued: u64,
    latest_applied: Option<u64>,
    // set by a limit change, consumed by the next accepted success
    page_reset_pending: bool,
    last_error: Option<FetchError>,
}

impl<S: ViewSchema> ViewState<S> {
    pub fn new(schema: Arc<S>) -> Self {
        let parameters = schema.default_parameters();
        Self {
            schema,
            phase: Phase::Idle,
            parameters,
            current_page: 1,
            records: Vec::new(),
            latest_issued: 0,
            latest_applied: None,
            page_reset_pending: false,
            last_error: None,
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn parameters(&self) -> RequestParameters<S::Field> {
        self.parameters
    }

    pub fn records(&self) -> &[S::Record] {
        &self.records
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn latest_applied(&self) -> Option<u64> {
        self.latest_applied
    }

    /// Issues a new sequence number for the current parameters and enters
    /// `Loading`.
    pub fn begin(&mut self, trigger: Trigger) -> FetchTicket<S::Field> {
        self.latest_issued += 1;
        self.phase = Phase::Loading;
        debug!(
            endpoint = self.schema.endpoint(),
            sequence = self.latest_issued,
            ?trigger,
            "fetch issued"
        );
        FetchTicket {
            sequence: self.latest_issued,
            parameters: self.parameters,
            trigger,
        }
    }

    /// Returns `None` when the limit (after coercion) did not change.
    pub fn set_limit(&mut self, limit: i64) -> Option<FetchTicket<S::Field>> {
        let next = self.parameters.with_limit(limit);
        if next == self.parameters {
            return None;
        }
        self.parameters = next;
        self.page_reset_pending = true;
        Some(self.begin(Trigger::Limit))
    }

    pub fn set_sort_field(&mut self, field: S::Field) -> Option<FetchTicket<S::Field>> {
        let next = self.parameters.with_sort_field(field);
        if next == self.parameters {
            return None;
        }
        self.parameters = next;
        Some(self.begin(Trigger::SortField))
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> Option<FetchTicket<S::Field>> {
        let next = self.parameters.with_sort_order(order);
        if next == self.parameters {
            return None;
        }
        self.parameters = next;
        Some(self.begin(Trigger::SortOrder))
    }

    /// Applies a resolved fetch. Returns false if the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket<S::Field>,
        outcome: FetchOutcome<S::Record>,
    ) -> bool {
        if ticket.sequence != self.latest_issued {
            debug!(
                endpoint = self.schema.endpoint(),
                sequence = ticket.sequence,
                latest = self.latest_issued,
                "discarding stale fetch result"
            );
            return false;
        }

        match outcome {
            FetchOutcome::Success(records) => {
                self.records = records;
                self.phase = Phase::Ready;
                self.last_error = None;
                if self.page_reset_pending {
                    self.current_page = 1;
                    self.page_reset_pending = false;
                }
            }
            FetchOutcome::Failure(err) => {
                // keep last-known-good records on screen
                self.phase = Phase::Error;
                self.last_error = Some(err);
            }
        }
        self.latest_applied = Some(ticket.sequence);
        self.clamp_page();
        true
    }

    pub fn next_page(&mut self) -> usize {
        self.current_page = (self.current_page + 1).min(self.total_pages());
        self.current_page
    }

    pub fn prev_page(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.clamp_page();
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        match self.schema.page_size() {
            Some(size) => self.visible_len().div_ceil(size.max(1)).max(1),
            None => 1,
        }
    }

    /// Records sorted by the current field/order, stable on ties, then
    /// truncated to the client limit if the view has one.
    pub fn sorted_rows(&self) -> Vec<S::Record> {
        let field = self.parameters.sort_field();
        let order = self.parameters.sort_order();

        let mut rows = self.records.clone();
        rows.sort_by(|a, b| order.apply(self.schema.compare(a, b, field)));
        if let Some(limit) = self.schema.client_limit(&self.parameters) {
            rows.truncate(limit);
        }
        rows
    }

    /// Rows of the current page (all rows for chart views).
    pub fn display_rows(&self) -> Vec<S::Record> {
        let rows = self.sorted_rows();
        match self.schema.page_size() {
            Some(size) => {
                let size = size.max(1);
                let start = (self.current_page - 1) * size;
                rows.into_iter().skip(start).take(size).collect()
            }
            None => rows,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot<S::Record, S::Field> {
        let total_records = self.visible_len();
        ViewSnapshot {
            phase: self.phase,
            display_rows: self.display_rows(),
            current_page: self.current_page,
            total_pages: self.total_pages(),
            total_records,
            parameters: self.parameters,
            last_error: self.last_error.clone(),
        }
    }

    fn visible_len(&self) -> usize {
        match self.schema.client_limit(&self.parameters) {
            Some(limit) => self.records.len().min(limit),
            None => self.records.len(),
        }
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }
}

/// Cloneable async controller handle.
///
/// Mutations are applied synchronously and hand back a [`PendingFetch`];
/// nothing goes over the wire until it is resolved (or spawned).
pub struct DataView<S: ViewSchema, T> {
    schema: Arc<S>,
    state: Shared<ViewState<S>>,
    fetcher: Arc<DataFetcher<T>>,
}

impl<S: ViewSchema, T> Clone for DataView<S, T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            state: self.state.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<S: ViewSchema, T: Transport + 'static> DataView<S, T> {
    pub fn new(schema: S, fetcher: Arc<DataFetcher<T>>) -> Self {
        let schema = Arc::new(schema);
        Self {
            state: new_state(ViewState::new(schema.clone())),
            schema,
            fetcher,
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// First load with the default parameters.
    pub fn load(&self) -> PendingFetch<S, T> {
        let ticket = self.state.lock().begin(Trigger::Initial);
        self.pending(ticket)
    }

    /// Re-issues the current parameters, typically after an error.
    pub fn retry(&self) -> PendingFetch<S, T> {
        let ticket = self.state.lock().begin(Trigger::Retry);
        self.pending(ticket)
    }

    pub fn set_limit(&self, limit: i64) -> Option<PendingFetch<S, T>> {
        let ticket = self.state.lock().set_limit(limit)?;
        Some(self.pending(ticket))
    }

    pub fn set_sort_field(&self, field: S::Field) -> Option<PendingFetch<S, T>> {
        let ticket = self.state.lock().set_sort_field(field)?;
        Some(self.pending(ticket))
    }

    pub fn set_sort_order(&self, order: SortOrder) -> Option<PendingFetch<S, T>> {
        let ticket = self.state.lock().set_sort_order(order)?;
        Some(self.pending(ticket))
    }

    pub fn next_page(&self) -> usize {
        self.state.lock().next_page()
    }

    pub fn prev_page(&self) -> usize {
        self.state.lock().prev_page()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase()
    }

    pub fn parameters(&self) -> RequestParameters<S::Field> {
        self.state.lock().parameters()
    }

    pub fn records(&self) -> Vec<S::Record> {
        self.state.lock().records().to_vec()
    }

    pub fn snapshot(&self) -> ViewSnapshot<S::Record, S::Field> {
        self.state.lock().snapshot()
    }

    fn pending(&self, ticket: FetchTicket<S::Field>) -> PendingFetch<S, T> {
        PendingFetch {
            view: self.clone(),
            ticket,
        }
    }
}

/// A fetch that has been issued (sequence number assigned) but not yet
/// performed.
#[must_use = "a pending fetch does nothing until it is resolved"]
pub struct PendingFetch<S: ViewSchema, T> {
    view: DataView<S, T>,
    ticket: FetchTicket<S::Field>,
}

impl<S: ViewSchema, T: Transport + 'static> PendingFetch<S, T> {
    pub fn ticket(&self) -> &FetchTicket<S::Field> {
        &self.ticket
    }

    /// Performs the request and applies the outcome. Returns whether the
    /// outcome was applied (false when a newer fetch superseded this one).
    pub async fn resolve(self) -> bool {
        let outcome = self
            .view
            .fetcher
            .fetch(self.view.schema.as_ref(), &self.ticket.parameters)
            .await;
        self.view.state.lock().complete(&self.ticket, outcome)
    }

    /// Runs `resolve` on the tokio runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<bool> {
        tokio::spawn(self.resolve())
    }
}
