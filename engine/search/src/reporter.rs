//! Reporting channel for incremental search results.
//!
//! The driver publishes a [`Decision`] after the opening guess and after every
//! completed depth. Consumers only care about the latest value, so the
//! standard channel is a `tokio::sync::watch` pair: one producer, one or more
//! readers, last value wins, no back-pressure.

use thiserror::Error;
use tokio::sync::watch;

/// A move recommendation published by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A> {
    /// The recommended action
    pub action: A,
    /// Depth limit of the search that produced it; 0 for the opening guess
    pub depth: u32,
    /// Search value for the fixed player, absent for the opening guess
    pub value: Option<f64>,
}

impl<A> Decision<A> {
    /// Whether this is the random opening move rather than a search result.
    pub fn is_opening_guess(&self) -> bool {
        self.depth == 0
    }
}

/// Errors that can occur while publishing a decision.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Decision consumer disconnected")]
    Disconnected,
}

/// Sink for decisions.
pub trait Reporter<A> {
    /// Publish `decision`, superseding anything published before.
    fn publish(&mut self, decision: Decision<A>) -> Result<(), ReportError>;
}

/// Sending half of the standard last-value-wins channel.
pub type DecisionSender<A> = watch::Sender<Option<Decision<A>>>;

/// Receiving half of the standard last-value-wins channel.
pub type DecisionReceiver<A> = watch::Receiver<Option<Decision<A>>>;

/// Create an empty last-value-wins decision channel.
pub fn decision_channel<A>() -> (DecisionSender<A>, DecisionReceiver<A>) {
    watch::channel(None)
}

impl<A> Reporter<A> for DecisionSender<A> {
    fn publish(&mut self, decision: Decision<A>) -> Result<(), ReportError> {
        self.send(Some(decision))
            .map_err(|_| ReportError::Disconnected)
    }
}

/// Keeps every publication, in order.
impl<A> Reporter<A> for Vec<Decision<A>> {
    fn publish(&mut self, decision: Decision<A>) -> Result<(), ReportError> {
        self.push(decision);
        Ok(())
    }
}
