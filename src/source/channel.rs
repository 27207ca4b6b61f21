//! Channel-based row source.
//!
//! Receives row batches via a tokio watch channel. Useful when embedding
//! the dashboard behind a collector that pushes data, and for driving the
//! app deterministically in tests.

use tokio::sync::watch;

use super::{RawRows, RowSource};

/// A row source fed by the sending half of a watch channel.
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<RawRows>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Wrap the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<RawRows>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a (sender, source) pair.
    ///
    /// The sender pushes row batches; the source hands them to the app on
    /// its next poll.
    pub fn create(source_description: &str) -> (watch::Sender<RawRows>, Self) {
        let (tx, rx) = watch::channel(RawRows::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl RowSource for ChannelSource {
    fn poll(&mut self) -> Option<RawRows> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Producer-side failures surface on the producer, not here.
        None
    }
}
