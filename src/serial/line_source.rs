//! Trait abstraction for line-buffered telemetry reads to enable testing

use async_trait::async_trait;

use crate::error::Result;

/// Outcome of one bounded read attempt against the telemetry link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One raw line, terminator included
    Line(String),
    /// The read timeout elapsed with no complete line; not an error
    Timeout,
}

/// Trait for line-oriented telemetry sources
///
/// A lost link surfaces as `Err(GpsBridgeError::LinkLost)`, distinct from the
/// `Timeout` outcome of a quiet link.
#[async_trait]
pub trait LineSource: Send {
    /// Wait for the next line, bounded by the source's read timeout
    async fn read_line(&mut self) -> Result<ReadOutcome>;

    /// Attempt to re-establish a lost link
    async fn reopen(&mut self) -> Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::error::GpsBridgeError;

    /// One scripted read result
    #[derive(Debug, Clone)]
    pub enum MockRead {
        Line(&'static str),
        Timeout,
        LinkLost(&'static str),
    }

    /// Mock line source replaying a scripted sequence of reads
    #[derive(Clone)]
    pub struct MockLineSource {
        reads: Arc<Mutex<VecDeque<MockRead>>>,
        reopen_results: Arc<Mutex<VecDeque<bool>>>,
        reopen_attempts: Arc<Mutex<usize>>,
    }

    impl MockLineSource {
        pub fn new(reads: Vec<MockRead>) -> Self {
            Self {
                reads: Arc::new(Mutex::new(reads.into())),
                reopen_results: Arc::new(Mutex::new(VecDeque::new())),
                reopen_attempts: Arc::new(Mutex::new(0)),
            }
        }

        /// Script the outcomes of successive reopen attempts
        pub fn with_reopen_results(self, results: Vec<bool>) -> Self {
            *self.reopen_results.lock().unwrap() = results.into();
            self
        }

        pub fn reopen_attempts(&self) -> usize {
            *self.reopen_attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl LineSource for MockLineSource {
        async fn read_line(&mut self) -> Result<ReadOutcome> {
            match self.reads.lock().unwrap().pop_front() {
                Some(MockRead::Line(line)) => Ok(ReadOutcome::Line(line.to_string())),
                Some(MockRead::Timeout) => Ok(ReadOutcome::Timeout),
                Some(MockRead::LinkLost(reason)) => {
                    Err(GpsBridgeError::LinkLost(reason.to_string()))
                }
                None => panic!("MockLineSource ran out of scripted reads"),
            }
        }

        async fn reopen(&mut self) -> Result<()> {
            *self.reopen_attempts.lock().unwrap() += 1;
            let ok = self.reopen_results.lock().unwrap().pop_front().unwrap_or(true);
            if ok {
                Ok(())
            } else {
                Err(GpsBridgeError::Serial("mock reopen failure".to_string()))
            }
        }
    }
}
