//! Cancellation-aware result sink.
//!
//! Checks the task's cancellation token before every result. Cancellation is therefore
//! observed at result granularity: a cancel takes effect the next time the engine
//! reports something, never between results.
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crypta_model::Found;

use crate::engine::{Cancelled, Flow, ResultSink};

/// Sink bound to one task.
///
/// Accumulates results privately up to an optional limit and raises [`Cancelled`]
/// once the task's token is set.
pub struct CancelAwareSink<'a> {
    token: &'a CancellationToken,
    limit: Option<usize>,
    results: Vec<Found>,
    raised: bool,
}

impl<'a> CancelAwareSink<'a> {
    pub fn new(token: &'a CancellationToken, limit: Option<usize>) -> Self {
        Self {
            token,
            limit,
            results: Vec::new(),
            raised: false,
        }
    }

    /// Whether this sink has raised [`Cancelled`] at least once.
    #[inline]
    pub fn raised_cancel(&self) -> bool {
        self.raised
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<Found> {
        self.results
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.results.len() >= limit)
    }
}

impl ResultSink for CancelAwareSink<'_> {
    fn accept(&mut self, found: Found) -> Result<Flow, Cancelled> {
        if self.token.is_cancelled() {
            if !self.raised {
                debug!(accepted = self.results.len(), "cancellation observed; aborting engine");
            }
            self.raised = true;
            return Err(Cancelled);
        }

        // An engine that ignores `Flow::Stop` must not grow the result list.
        if self.is_full() {
            return Ok(Flow::Stop);
        }

        self.results.push(found);
        trace!(accepted = self.results.len(), "result accepted");

        if self.is_full() {
            Ok(Flow::Stop)
        } else {
            Ok(Flow::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(i: usize) -> Found {
        Found::new(format!("node-{i}"), format!("sol-{i}"))
    }

    #[test]
    fn forwards_results_until_cancelled() {
        let token = CancellationToken::new();
        let mut sink = CancelAwareSink::new(&token, None);

        assert_eq!(sink.accept(found(0)), Ok(Flow::Continue));
        assert_eq!(sink.accept(found(1)), Ok(Flow::Continue));

        token.cancel();
        assert_eq!(sink.accept(found(2)), Err(Cancelled));
        assert_eq!(sink.accept(found(3)), Err(Cancelled));

        assert!(sink.raised_cancel());
        assert_eq!(sink.into_results(), vec![found(0), found(1)]);
    }

    #[test]
    fn stops_at_limit() {
        let token = CancellationToken::new();
        let mut sink = CancelAwareSink::new(&token, Some(2));

        assert_eq!(sink.accept(found(0)), Ok(Flow::Continue));
        assert_eq!(sink.accept(found(1)), Ok(Flow::Stop));
        assert_eq!(sink.accept(found(2)), Ok(Flow::Stop));
        assert_eq!(sink.len(), 2);
        assert!(!sink.raised_cancel());
    }

    #[test]
    fn cancellation_wins_over_full_limit() {
        let token = CancellationToken::new();
        let mut sink = CancelAwareSink::new(&token, Some(1));

        assert_eq!(sink.accept(found(0)), Ok(Flow::Stop));
        token.cancel();
        assert_eq!(sink.accept(found(1)), Err(Cancelled));
    }

    #[test]
    fn cancelled_before_first_result() {
        let token = CancellationToken::new();
        token.cancel();
        let mut sink = CancelAwareSink::new(&token, None);

        assert_eq!(sink.accept(found(0)), Err(Cancelled));
        assert!(sink.is_empty());
    }
}
