//! CounterSource: emits a fixed number of `u64` frames.

use crate::graph::error::GraphResult;
use crate::graph::filter::{Filter, FilterPorts, ProcessStatus};
use crate::graph::frame::{Frame, FrameFormat};
use crate::graph::port::PortDescriptor;
use std::time::Duration;

/// Format tag of frames produced by [`CounterSource`].
pub const COUNTER_FORMAT: FrameFormat = FrameFormat::from_static("counter/u64");

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("out")];

/// Source that pushes frames carrying `0..count`, one per `process` call,
/// then finishes.
pub struct CounterSource {
    name: String,
    ports: FilterPorts,
    count: u64,
    emitted: u64,
    interval: Duration,
}

impl CounterSource {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        let name = name.into();
        Self {
            ports: FilterPorts::new(name.as_str(), PORTS),
            name,
            count,
            emitted: 0,
            interval: Duration::ZERO,
        }
    }

    /// Stamp frame `n` with `n * interval`.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Filter for CounterSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &FilterPorts {
        &self.ports
    }

    fn on_open(&mut self) -> GraphResult<()> {
        self.emitted = 0;
        Ok(())
    }

    fn process(&mut self) -> GraphResult<ProcessStatus> {
        if self.emitted >= self.count {
            return Ok(ProcessStatus::Finished);
        }

        let timestamp = self.interval * u32::try_from(self.emitted).unwrap_or(u32::MAX);
        let frame = Frame::with_timestamp(COUNTER_FORMAT, timestamp, self.emitted);
        self.ports.push("out", frame)?;
        self.emitted += 1;

        if self.emitted == self.count {
            Ok(ProcessStatus::Finished)
        } else {
            Ok(ProcessStatus::Continue)
        }
    }
}
