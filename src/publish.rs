use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the message sink. Publish failures are recoverable: the
/// pipeline logs them and tries again on the next tick.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("connection to message sink lost: {0}")]
    Connection(String),
    #[error("failed to deliver message: {0}")]
    Publish(String),
}

/// Client for the external message bus
pub trait Publisher: Send {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

/// Periodic analytics summary sent to the remote sink
#[derive(Debug, Serialize)]
pub struct Summary {
    #[serde(rename = "TOTAL_IN")]
    pub total_in: u64,
    #[serde(rename = "TOTAL_OUT")]
    pub total_out: u64,
}

impl Summary {
    pub fn payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Writes summaries to stdout as topic-prefixed JSON lines
pub struct ConsolePublisher;

impl Publisher for ConsolePublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        println!("{} {}", topic, payload);
        Ok(())
    }
}
