use std::future::Future;

use tracing::debug;

use crate::error::ApiError;

/// Hands out strictly increasing tickets; only the newest one may apply its result.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl RequestSequencer {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest == ticket.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// A newer request was issued meanwhile; the result was dropped.
    Stale,
}

/// State of one remotely fetched value.
///
/// `load` keeps `&mut self` across the await, so requests made through it
/// never overlap. Callers that let requests race (a new selection issued
/// while an older fetch is still in flight) take a ticket with `begin` and
/// hand the result back with `settle`; only the latest ticket is applied.
#[derive(Debug)]
pub struct Remote<T> {
    seq: RequestSequencer,
    loading: bool,
    error: Option<String>,
    session_expired: bool,
    value: Option<T>,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            seq: RequestSequencer::default(),
            loading: false,
            error: None,
            session_expired: false,
            value: None,
        }
    }
}

impl<T> Remote<T> {
    /// Starts a request. Error and session-expired state of earlier
    /// requests are cleared.
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.session_expired = false;
        self.seq.issue()
    }

    /// Applies `result` if `ticket` is still the latest request. A success
    /// replaces the value wholesale, a 401 only raises the session-expired
    /// flag, any other failure becomes the inline error message.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> Settled {
        if !self.seq.is_latest(ticket) {
            debug!(?ticket, "discarding stale response");
            return Settled::Stale;
        }
        self.loading = false;
        match result {
            Ok(value) => self.value = Some(value),
            Err(ApiError::Unauthorized) => self.session_expired = true,
            Err(e) => self.error = Some(e.to_string()),
        }
        Settled::Applied
    }

    pub async fn load<F>(&mut self, request: F) -> Settled
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.begin();
        let result = request.await;
        self.settle(ticket, result)
    }

    pub fn expire_session(&mut self) {
        self.session_expired = true;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
