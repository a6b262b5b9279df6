//! Optional error-reporting hook. The cache never propagates fetch
//! failures; a host that wants to observe them hands the cache a sender
//! and drains the collector when convenient.

use crate::api::Category;
use crate::error::FetchError;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub struct FetchProblem {
    pub category: Category,
    pub error: FetchError,
}

#[derive(Debug)]
pub struct DiagnosticsCollector {
    sender: UnboundedSender<FetchProblem>,
    receiver: UnboundedReceiver<FetchProblem>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();

        Self { sender, receiver }
    }

    /// Get a sender to report problems through.
    pub fn sender(&self) -> DiagnosticsSender {
        DiagnosticsSender {
            sender: self.sender.clone(),
        }
    }

    /// Drain everything reported so far without waiting, logging each
    /// problem on the way out.
    pub fn drain(&mut self) -> Vec<FetchProblem> {
        let mut problems = Vec::new();

        loop {
            match self.receiver.try_recv() {
                Ok(problem) => {
                    tracing::warn!(
                        "manifest refresh failed for {}: {}",
                        problem.category,
                        problem.error
                    );
                    problems.push(problem);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        problems
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticsSender {
    sender: UnboundedSender<FetchProblem>,
}

impl DiagnosticsSender {
    pub fn send_fetch_problem(&self, category: Category, error: FetchError) {
        let _ = self.sender.send(FetchProblem { category, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn drained_problems_come_back_in_order() {
        let mut collector = DiagnosticsCollector::new();
        let sender = collector.sender();

        sender.send_fetch_problem(
            Category::Addons,
            FetchError::Http(StatusCode::INTERNAL_SERVER_ERROR),
        );
        sender.send_fetch_problem(
            Category::Themes,
            FetchError::Http(StatusCode::NOT_FOUND),
        );

        let problems = collector.drain();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].category, Category::Addons);
        assert_eq!(problems[1].category, Category::Themes);

        assert!(collector.drain().is_empty());
    }
}
