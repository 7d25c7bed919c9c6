//! In-memory transport recording every request it is given.

use crate::client::{ApiRequest, HttpHeaders, Method, Transport, TransportError, TransportResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Request as seen by a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    fn from_request(request: &ApiRequest) -> Self {
        Self {
            method: request.method(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body: request.body().map(<[u8]>::to_vec),
        }
    }

    /// Body as UTF-8 text, if any.
    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

type Responder = Box<dyn Fn(&RecordedRequest) -> Result<TransportResponse, TransportError> + Send>;

#[derive(Default)]
struct RecordingState {
    requests: Vec<RecordedRequest>,
    queued: VecDeque<Result<TransportResponse, TransportError>>,
    responder: Option<Responder>,
    close_calls: usize,
}

/// Transport answering from a script and keeping every request it sends.
///
/// Every handle shares the same recording and script, so a test keeps one
/// handle to inspect what the client sent. Being closed belongs to a single
/// handle: [`RecordingTransport::connect`] hands out an open one for each
/// client. Queued responses are returned first, then the responder, then an
/// empty `200`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<RecordingState>>,
    closed: bool,
}

impl std::fmt::Debug for RecordingTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("RecordingTransport")
            .field("requests", &state.requests.len())
            .field("queued", &state.queued.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering every request with `responder`.
    #[must_use]
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<TransportResponse, TransportError> + Send + 'static,
    {
        let transport = Self::new();
        transport.lock().responder = Some(Box::new(responder));
        transport
    }

    /// Open handle on the same recording.
    #[must_use]
    pub fn connect(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            closed: false,
        }
    }

    /// Queues the response of one upcoming request.
    pub fn push_response(&self, response: TransportResponse) {
        self.lock().queued.push_back(Ok(response));
    }

    /// Queues a failure for one upcoming request.
    pub fn push_error(&self, error: TransportError) {
        self.lock().queued.push_back(Err(error));
    }

    /// Requests sent so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    /// Whether this handle was closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of times `close` was called on any handle.
    #[must_use]
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, request: &ApiRequest) -> Result<TransportResponse, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        let mut state = self.lock();
        let recorded = RecordedRequest::from_request(request);
        state.requests.push(recorded.clone());

        if let Some(queued) = state.queued.pop_front() {
            return queued;
        }
        match &state.responder {
            Some(responder) => responder(&recorded),
            None => Ok(TransportResponse::new(200)),
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.lock().close_calls += 1;
    }
}
