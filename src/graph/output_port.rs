//! Producing port used by filters to emit frames.
//!
//! `OutputPort` buffers nothing. Every frame-carrying call is forwarded to
//! the connected `InputPort`, so each connection has exactly one place
//! where frames wait and `has_frame` has a single answer.

use crate::graph::error::{PortError, PortResult};
use crate::graph::frame::Frame;
use crate::graph::input_port::InputPort;
use crate::graph::port::{Port, PortDescriptor, PortDirection, PortInfo, PortOp, PortState};
use crate::graph::source_port::SourceLink;
use std::sync::Arc;

pub struct OutputPort {
    link: SourceLink,
}

impl OutputPort {
    pub fn new(filter: impl Into<String>, descriptor: &PortDescriptor) -> Self {
        debug_assert_eq!(descriptor.direction, PortDirection::Output);
        Self {
            link: SourceLink::new(
                PortInfo::new(filter, descriptor.name, PortDirection::Output),
                descriptor.blocking,
            ),
        }
    }

    /// Wire this output to `target`. Both ends must be unconnected.
    pub fn connect_to(&self, target: &Arc<InputPort>) -> PortResult<()> {
        self.link.attach(target)?;
        // A connection made while running delivers immediately.
        if self.link.is_open() {
            target.open();
        }
        tracing::debug!("Connected {} -> {}", self.link.info(), target.info());
        Ok(())
    }

    /// Remove the connection, dropping frames still queued downstream.
    /// Disconnecting an unconnected port is a no-op.
    pub fn disconnect(&self) {
        if let Some(target) = self.link.detach() {
            tracing::debug!("Disconnected {} -> {}", self.link.info(), target.info());
        }
    }

    pub fn target(&self) -> Option<Arc<InputPort>> {
        self.link.target()
    }
}

impl Port for OutputPort {
    fn info(&self) -> &PortInfo {
        self.link.info()
    }

    fn open(&self) {
        if self.link.set_open(true) {
            tracing::debug!("Opened {}", self.link.info());
        }
        if let Some(target) = self.link.target() {
            target.mark_source_open();
            target.open();
        }
    }

    fn close(&self) {
        if self.link.set_open(false) {
            tracing::debug!("Closed {}", self.link.info());
        }
        // The consumer keeps what is queued and drains it before closing.
        if let Some(target) = self.link.target() {
            target.mark_source_closed();
        }
    }

    fn is_open(&self) -> bool {
        self.link.is_open()
    }

    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    fn is_blocking(&self) -> bool {
        self.link.is_blocking()
    }

    fn clear(&self) {
        if let Some(target) = self.link.target() {
            target.clear();
        }
    }

    fn push_frame(&self, frame: Frame) -> PortResult<()> {
        let target = self.link.target().ok_or_else(|| PortError::UnconnectedPush {
            port: self.link.info().clone(),
        })?;
        target.push_frame(frame)
    }

    fn set_frame(&self, frame: Frame) -> PortResult<()> {
        self.link.assert_port_is_open(PortOp::Set)?;
        let target = self.link.target().ok_or_else(|| PortError::UnconnectedSet {
            port: self.link.info().clone(),
        })?;
        target.set_frame(frame)
    }

    fn pull_frame(&self) -> PortResult<Frame> {
        Err(PortError::InvalidDirection {
            port: self.link.info().clone(),
            op: PortOp::Pull,
        })
    }

    fn has_frame(&self) -> bool {
        self.link
            .target()
            .map(|target| target.has_frame())
            .unwrap_or(false)
    }

    fn is_ready(&self) -> bool {
        (self.is_open() && !self.has_frame()) || !self.is_blocking()
    }

    fn filter_must_close(&self) -> bool {
        !self.is_open() && self.is_blocking()
    }

    fn state(&self) -> PortState {
        self.link.state()
    }
}

impl std::fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputPort")
            .field("info", self.link.info())
            .field("state", &self.link.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::frame::FrameFormat;

    fn frame(n: u64) -> Frame {
        Frame::new(FrameFormat::OPAQUE, n)
    }

    fn pair() -> (OutputPort, Arc<InputPort>) {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        let input = Arc::new(InputPort::new("sink", &PortDescriptor::input("in")));
        output.connect_to(&input).unwrap();
        (output, input)
    }

    #[test]
    fn test_state_machine() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        assert_eq!(output.state(), PortState::Unconnected);

        let input = Arc::new(InputPort::new("sink", &PortDescriptor::input("in")));
        output.connect_to(&input).unwrap();
        assert_eq!(output.state(), PortState::ConnectedClosed);

        output.open();
        assert_eq!(output.state(), PortState::ConnectedOpen);

        output.clear();
        assert_eq!(output.state(), PortState::ConnectedOpen);

        output.close();
        assert_eq!(output.state(), PortState::ConnectedClosed);

        output.disconnect();
        assert_eq!(output.state(), PortState::Unconnected);
    }

    #[test]
    fn test_open_opens_target() {
        let (output, input) = pair();
        assert!(!input.is_open());
        output.open();
        assert!(input.is_open());
    }

    #[test]
    fn test_close_marks_source_closed_but_keeps_frames() {
        let (output, input) = pair();
        output.open();
        output.push_frame(frame(1)).unwrap();
        output.close();

        assert!(input.is_open());
        assert!(input.is_source_closed());
        assert!(input.has_frame());
    }

    #[test]
    fn test_push_forwards_to_target() {
        let (output, input) = pair();
        output.open();
        output.push_frame(frame(1)).unwrap();
        output.push_frame(frame(2)).unwrap();

        assert!(output.has_frame());
        assert_eq!(input.pull_frame().unwrap().payload::<u64>(), Some(&1));
        assert_eq!(input.pull_frame().unwrap().payload::<u64>(), Some(&2));
        assert!(!output.has_frame());
    }

    #[test]
    fn test_push_unconnected_fails() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        output.open();
        let err = output.push_frame(frame(1)).unwrap_err();
        assert!(matches!(err, PortError::UnconnectedPush { .. }));
        assert!(!output.has_frame());
    }

    #[test]
    fn test_push_does_not_require_output_open() {
        let (output, input) = pair();
        input.open();
        output.push_frame(frame(1)).unwrap();
        assert!(input.has_frame());
    }

    #[test]
    fn test_set_requires_open() {
        let (output, input) = pair();
        input.open();
        let err = output.set_frame(frame(1)).unwrap_err();
        assert!(matches!(err, PortError::PortNotOpen { op: PortOp::Set, .. }));
        assert!(!input.has_frame());
    }

    #[test]
    fn test_set_unconnected_fails() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        output.open();
        let err = output.set_frame(frame(1)).unwrap_err();
        assert!(matches!(err, PortError::UnconnectedSet { .. }));
    }

    #[test]
    fn test_set_closed_and_unconnected_reports_not_open() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        let err = output.set_frame(frame(1)).unwrap_err();
        assert!(matches!(err, PortError::PortNotOpen { .. }));
    }

    #[test]
    fn test_pull_always_fails() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        assert!(matches!(
            output.pull_frame(),
            Err(PortError::InvalidDirection { op: PortOp::Pull, .. })
        ));

        let (output, _input) = pair();
        output.open();
        output.push_frame(frame(1)).unwrap();
        assert!(matches!(
            output.pull_frame(),
            Err(PortError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn test_clear_flushes_target() {
        let (output, input) = pair();
        output.open();
        output.push_frame(frame(1)).unwrap();
        output.clear();
        assert!(!input.has_frame());
        output.clear();
        assert!(!input.has_frame());
    }

    #[test]
    fn test_clear_after_target_dropped_is_noop() {
        let (output, input) = pair();
        output.open();
        drop(input);
        output.clear();
        assert!(!output.has_frame());
        assert!(matches!(
            output.push_frame(frame(1)),
            Err(PortError::UnconnectedPush { .. })
        ));
    }

    #[test]
    fn test_readiness() {
        let (output, _input) = pair();
        assert!(!output.is_ready());
        assert!(output.filter_must_close());

        output.open();
        assert!(output.is_ready());
        assert!(!output.filter_must_close());

        output.push_frame(frame(1)).unwrap();
        assert!(!output.is_ready(), "downstream still holds a frame");
    }

    #[test]
    fn test_connect_while_open_opens_target() {
        let output = OutputPort::new("source", &PortDescriptor::output("out"));
        output.open();
        let input = Arc::new(InputPort::new("sink", &PortDescriptor::input("in")));
        output.connect_to(&input).unwrap();
        assert!(input.is_open());
    }
}
