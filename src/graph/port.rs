//! Port descriptors and the uniform port contract.
//!
//! Each filter declares its ports (inputs/outputs) via `PortDescriptor`
//! arrays. At runtime every port, whatever its direction, answers to the
//! [`Port`] trait: `OutputPort` forwards everything to its connected
//! `InputPort`, which is the only place frames are buffered.

use crate::graph::error::PortResult;
use crate::graph::frame::{Frame, FrameFormat};
use serde::Serialize;
use std::fmt;

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// Static descriptor for a filter's port.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    /// Required frame format. `None` accepts any frame.
    pub format: Option<FrameFormat>,
    /// Blocking ports gate their filter's readiness.
    pub blocking: bool,
    /// Queue capacity for inputs. `None` takes the graph default.
    pub capacity: Option<usize>,
}

impl PortDescriptor {
    pub const fn input(name: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            format: None,
            blocking: true,
            capacity: None,
        }
    }

    pub const fn output(name: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            format: None,
            blocking: true,
            capacity: None,
        }
    }

    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn non_blocking(mut self) -> Self {
        self.blocking = false;
        self
    }
}

/// Identity of a live port: owning filter, port name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PortInfo {
    pub filter: String,
    pub name: String,
    pub direction: PortDirection,
}

impl PortInfo {
    pub fn new(
        filter: impl Into<String>,
        name: impl Into<String>,
        direction: PortDirection,
    ) -> Self {
        Self {
            filter: filter.into(),
            name: name.into(),
            direction,
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} port '{}' of filter '{}'",
            self.direction, self.name, self.filter
        )
    }
}

/// Operation attempted on a port, carried by errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOp {
    Open,
    Close,
    Clear,
    Push,
    Set,
    Pull,
    Connect,
    Disconnect,
}

impl fmt::Display for PortOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortOp::Open => "open",
            PortOp::Close => "close",
            PortOp::Clear => "clear",
            PortOp::Push => "push",
            PortOp::Set => "set",
            PortOp::Pull => "pull",
            PortOp::Connect => "connect",
            PortOp::Disconnect => "disconnect",
        };
        f.write_str(s)
    }
}

/// Connection/lifecycle state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortState {
    Unconnected,
    ConnectedClosed,
    ConnectedOpen,
}

impl PortState {
    pub fn from_flags(connected: bool, open: bool) -> Self {
        match (connected, open) {
            (false, _) => PortState::Unconnected,
            (true, false) => PortState::ConnectedClosed,
            (true, true) => PortState::ConnectedOpen,
        }
    }
}

/// Uniform contract shared by producing and consuming ports.
///
/// All methods take `&self`; implementations keep their state behind
/// atomics and locks so a port can be driven from any scheduler thread.
/// None of the operations block.
pub trait Port: Send + Sync {
    fn info(&self) -> &PortInfo;

    fn open(&self);

    /// Closing releases any frame buffered on this port.
    fn close(&self);

    fn is_open(&self) -> bool;

    fn is_connected(&self) -> bool;

    fn is_blocking(&self) -> bool;

    /// Drop buffered frames reachable through this port. Never changes
    /// topology or open state, and is safe to call repeatedly.
    fn clear(&self);

    /// Eager delivery. Does not itself require the port to be open.
    fn push_frame(&self, frame: Frame) -> PortResult<()>;

    /// Latest-value delivery. Requires the port to be open.
    fn set_frame(&self, frame: Frame) -> PortResult<()>;

    fn pull_frame(&self) -> PortResult<Frame>;

    fn has_frame(&self) -> bool;

    /// Whether the owning filter may run with respect to this port.
    fn is_ready(&self) -> bool;

    /// Whether this port forces its owning filter to finish.
    fn filter_must_close(&self) -> bool;

    fn direction(&self) -> PortDirection {
        self.info().direction
    }

    fn state(&self) -> PortState {
        PortState::from_flags(self.is_connected(), self.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let d = PortDescriptor::input("in");
        assert_eq!(d.direction, PortDirection::Input);
        assert!(d.blocking);
        assert!(d.format.is_none());
        assert!(d.capacity.is_none());

        let d = PortDescriptor::output("out")
            .non_blocking()
            .with_format(FrameFormat::OPAQUE);
        assert_eq!(d.direction, PortDirection::Output);
        assert!(!d.blocking);
        assert_eq!(d.format, Some(FrameFormat::OPAQUE));
    }

    #[test]
    fn test_port_info_display() {
        let info = PortInfo::new("decoder", "video", PortDirection::Output);
        assert_eq!(info.to_string(), "output port 'video' of filter 'decoder'");
    }

    #[test]
    fn test_state_from_flags() {
        assert_eq!(PortState::from_flags(false, true), PortState::Unconnected);
        assert_eq!(PortState::from_flags(true, false), PortState::ConnectedClosed);
        assert_eq!(PortState::from_flags(true, true), PortState::ConnectedOpen);
    }
}
