//! Latest-wins request tracking.

use super::{ConversionInput, ConversionMode, ConversionOutput, Converter};
use crate::error::Result;

/// Identifier of a conversion request within a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Numeric value of the id.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of the most recent conversion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversionState {
    /// Nothing requested yet, or reset
    #[default]
    Idle,
    /// A request is in flight
    Converting(RequestId),
    /// The latest request succeeded
    Ready(RequestId, ConversionOutput),
    /// The latest request failed with a user-facing message
    Failed(RequestId, String),
}

impl ConversionState {
    /// Whether a request is in flight.
    pub fn is_converting(&self) -> bool {
        matches!(self, ConversionState::Converting(_))
    }

    /// The request this state belongs to.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            ConversionState::Idle => None,
            ConversionState::Converting(id)
            | ConversionState::Ready(id, _)
            | ConversionState::Failed(id, _) => Some(*id),
        }
    }

    /// Output of a successful request.
    pub fn output(&self) -> Option<&ConversionOutput> {
        match self {
            ConversionState::Ready(_, output) => Some(output),
            _ => None,
        }
    }

    /// Message of a failed request.
    pub fn error(&self) -> Option<&str> {
        match self {
            ConversionState::Failed(_, message) => Some(message),
            _ => None,
        }
    }
}

/// Tracks conversion requests so that only the latest one is shown.
///
/// Each [`begin`](Session::begin) supersedes earlier requests; results
/// delivered for a superseded request are discarded by
/// [`finish`](Session::finish).
///
/// # Example
///
/// ```
/// use docmd::convert::{ConversionOutput, Session};
///
/// let mut session = Session::new();
/// let first = session.begin();
/// let second = session.begin();
///
/// assert!(!session.finish(first, Ok(ConversionOutput::Echo("old".into()))));
/// assert!(session.finish(second, Ok(ConversionOutput::Echo("new".into()))));
/// assert_eq!(session.state().output(), Some(&ConversionOutput::Echo("new".into())));
/// ```
#[derive(Debug, Default)]
pub struct Session {
    next_id: u64,
    state: ConversionState,
}

impl Session {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any request in flight.
    pub fn begin(&mut self) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        if let Some(previous) = self.state.request().filter(|_| self.state.is_converting()) {
            log::debug!("request {} superseded by {}", previous, id);
        }
        self.state = ConversionState::Converting(id);
        id
    }

    /// Deliver the result of a request.
    ///
    /// Returns `false` and leaves the state untouched unless `id` is the
    /// request currently converting. A request settles once.
    pub fn finish(&mut self, id: RequestId, result: Result<ConversionOutput>) -> bool {
        if !matches!(self.state, ConversionState::Converting(current) if current == id) {
            log::debug!("dropping stale result of request {}", id);
            return false;
        }

        self.state = match result {
            Ok(output) => {
                log::info!("request {} ready: {}", id, output.suggested_file_name());
                ConversionState::Ready(id, output)
            }
            Err(e) => {
                log::info!("request {} failed: {}", id, e);
                ConversionState::Failed(id, e.to_string())
            }
        };
        true
    }

    /// Run a request to completion.
    pub fn convert(
        &mut self,
        converter: &Converter,
        input: ConversionInput,
        mode: ConversionMode,
    ) -> &ConversionState {
        let id = self.begin();
        let result = converter.convert(input, mode);
        self.finish(id, result);
        &self.state
    }

    /// Current state.
    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Return to idle; results of requests in flight will be dropped.
    pub fn reset(&mut self) {
        self.next_id += 1;
        self.state = ConversionState::Idle;
    }
}
