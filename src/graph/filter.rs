//! Filter abstraction and the named port set each filter owns.

use crate::graph::error::{GraphError, GraphResult};
use crate::graph::frame::Frame;
use crate::graph::input_port::InputPort;
use crate::graph::output_port::OutputPort;
use crate::graph::port::{Port, PortDescriptor, PortDirection};
use std::sync::Arc;

/// Outcome of one `Filter::process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Run again when the ports are ready.
    Continue,
    /// The filter has nothing more to produce; its outputs get closed.
    Finished,
}

/// A graph node driven by a scheduler.
///
/// `process` is only called when every port of the filter reports ready,
/// so a filter can pull one frame per input and push one frame per output
/// without further checks.
pub trait Filter: Send {
    fn name(&self) -> &str;

    fn ports(&self) -> &FilterPorts;

    /// Called once the filter's ports are open, before the first `process`.
    fn on_open(&mut self) -> GraphResult<()> {
        Ok(())
    }

    fn process(&mut self) -> GraphResult<ProcessStatus>;

    /// Called after the filter finished or the run ended.
    fn on_close(&mut self) {}
}

/// Named input and output ports of one filter.
pub struct FilterPorts {
    filter: String,
    inputs: Vec<Arc<InputPort>>,
    outputs: Vec<OutputPort>,
}

impl FilterPorts {
    pub fn new(filter: impl Into<String>, descriptors: &[PortDescriptor]) -> Self {
        let filter = filter.into();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for descriptor in descriptors {
            debug_assert!(
                descriptors
                    .iter()
                    .filter(|d| d.name == descriptor.name && d.direction == descriptor.direction)
                    .count()
                    == 1,
                "duplicate port '{}' on filter '{}'",
                descriptor.name,
                filter
            );
            match descriptor.direction {
                PortDirection::Input => {
                    inputs.push(Arc::new(InputPort::new(filter.as_str(), descriptor)))
                }
                PortDirection::Output => outputs.push(OutputPort::new(filter.as_str(), descriptor)),
            }
        }

        Self {
            filter,
            inputs,
            outputs,
        }
    }

    pub fn filter_name(&self) -> &str {
        &self.filter
    }

    pub fn inputs(&self) -> &[Arc<InputPort>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    /// Every port, inputs first.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Port> + '_ {
        self.inputs
            .iter()
            .map(|p| p.as_ref() as &dyn Port)
            .chain(self.outputs.iter().map(|p| p as &dyn Port))
    }

    pub fn input(&self, name: &str) -> GraphResult<&Arc<InputPort>> {
        self.inputs
            .iter()
            .find(|p| p.info().name == name)
            .ok_or_else(|| self.unknown(name, PortDirection::Input))
    }

    pub fn output(&self, name: &str) -> GraphResult<&OutputPort> {
        self.outputs
            .iter()
            .find(|p| p.info().name == name)
            .ok_or_else(|| self.unknown(name, PortDirection::Output))
    }

    fn unknown(&self, name: &str, direction: PortDirection) -> GraphError {
        GraphError::UnknownPort {
            filter: self.filter.clone(),
            port: name.to_string(),
            direction,
        }
    }

    pub fn pull(&self, name: &str) -> GraphResult<Frame> {
        Ok(self.input(name)?.pull_frame()?)
    }

    pub fn push(&self, name: &str, frame: Frame) -> GraphResult<()> {
        Ok(self.output(name)?.push_frame(frame)?)
    }

    pub fn set(&self, name: &str, frame: Frame) -> GraphResult<()> {
        Ok(self.output(name)?.set_frame(frame)?)
    }

    pub fn open_all(&self) {
        for port in self.iter() {
            port.open();
        }
    }

    pub fn close_outputs(&self) {
        for port in &self.outputs {
            port.close();
        }
    }

    pub fn close_all(&self) {
        for port in self.iter() {
            port.close();
        }
    }

    pub fn clear_all(&self) {
        for port in self.iter() {
            port.clear();
        }
    }

    /// All ports ready: the filter may be processed.
    pub fn is_ready(&self) -> bool {
        self.iter().all(|p| p.is_ready())
    }

    /// Some port forces the filter to finish.
    pub fn must_close(&self) -> bool {
        self.iter().any(|p| p.filter_must_close())
    }
}

impl std::fmt::Debug for FilterPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPorts")
            .field("filter", &self.filter)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::error::PortError;
    use crate::graph::frame::FrameFormat;

    fn ports() -> FilterPorts {
        FilterPorts::new(
            "scaler",
            &[PortDescriptor::input("in"), PortDescriptor::output("out")],
        )
    }

    #[test]
    fn test_lookup() {
        let ports = ports();
        assert_eq!(ports.inputs().len(), 1);
        assert_eq!(ports.outputs().len(), 1);
        assert_eq!(ports.input("in").unwrap().info().filter, "scaler");
        assert!(ports.output("out").is_ok());

        let err = ports.input("out").unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownPort {
                direction: PortDirection::Input,
                ..
            }
        ));
    }

    #[test]
    fn test_push_on_unconnected_output_surfaces_port_error() {
        let ports = ports();
        ports.open_all();
        let err = ports
            .push("out", Frame::new(FrameFormat::OPAQUE, ()))
            .unwrap_err();
        assert!(matches!(
            err.as_port_error(),
            Some(PortError::UnconnectedPush { .. })
        ));
    }

    #[test]
    fn test_readiness_aggregates() {
        let ports = ports();
        assert!(!ports.is_ready());
        // Closed blocking output forces the filter to close.
        assert!(ports.must_close());

        ports.open_all();
        assert!(!ports.must_close());
        // Input has no frame yet.
        assert!(!ports.is_ready());

        ports.close_all();
        assert!(ports.iter().all(|p| !p.is_open()));
    }
}
