//! ChannelSink: hands pulled frames to another thread via crossbeam channel.

use crate::graph::error::GraphResult;
use crate::graph::filter::{Filter, FilterPorts, ProcessStatus};
use crate::graph::frame::Frame;
use crate::graph::port::PortDescriptor;
use crossbeam_channel::Sender;

static PORTS: &[PortDescriptor] = &[PortDescriptor::input("in")];

/// Terminal filter: every frame pulled from `in` is sent on `tx`.
///
/// Uses `try_send`, so a full or disconnected channel drops the frame
/// instead of stalling the graph.
pub struct ChannelSink {
    name: String,
    ports: FilterPorts,
    tx: Sender<Frame>,
    received: u64,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(name: impl Into<String>, tx: Sender<Frame>) -> Self {
        let name = name.into();
        Self {
            ports: FilterPorts::new(name.as_str(), PORTS),
            name,
            tx,
            received: 0,
            dropped: 0,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Filter for ChannelSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &FilterPorts {
        &self.ports
    }

    fn on_open(&mut self) -> GraphResult<()> {
        self.received = 0;
        self.dropped = 0;
        Ok(())
    }

    fn process(&mut self) -> GraphResult<ProcessStatus> {
        let frame = self.ports.pull("in")?;
        self.received += 1;
        if self.tx.try_send(frame).is_err() {
            self.dropped += 1;
        }
        Ok(ProcessStatus::Continue)
    }

    fn on_close(&mut self) {
        if self.dropped > 0 {
            tracing::warn!(
                "ChannelSink '{}' dropped {} frames due to backpressure",
                self.name,
                self.dropped
            );
        }
    }
}
