//! Passthrough: forwards every frame unchanged.

use crate::graph::error::GraphResult;
use crate::graph::filter::{Filter, FilterPorts, ProcessStatus};
use crate::graph::port::PortDescriptor;

static PORTS: &[PortDescriptor] = &[PortDescriptor::input("in"), PortDescriptor::output("out")];

/// Moves the frame handle from `in` to `out`. The payload is never copied.
pub struct Passthrough {
    name: String,
    ports: FilterPorts,
    forwarded: u64,
}

impl Passthrough {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ports: FilterPorts::new(name.as_str(), PORTS),
            name,
            forwarded: 0,
        }
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl Filter for Passthrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &FilterPorts {
        &self.ports
    }

    fn process(&mut self) -> GraphResult<ProcessStatus> {
        let frame = self.ports.pull("in")?;
        self.ports.push("out", frame)?;
        self.forwarded += 1;
        Ok(ProcessStatus::Continue)
    }
}
