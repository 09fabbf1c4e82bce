//! Graph and port error types.
//!
//! Every `PortError` is a wiring or filter-logic bug, not a transient
//! condition. They are returned, never retried, and always name the port
//! (owning filter + port name) that rejected the call.

use crate::graph::frame::FrameFormat;
use crate::graph::id::{ConnectionId, FilterId};
use crate::graph::port::{PortDirection, PortInfo, PortOp};
use thiserror::Error;

/// Errors raised by a single port operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortError {
    #[error("Attempting to push frame on unconnected {port}")]
    UnconnectedPush { port: PortInfo },

    #[error("Attempting to set frame on unconnected {port}")]
    UnconnectedSet { port: PortInfo },

    #[error("Illegal {op} on closed {port}")]
    PortNotOpen { port: PortInfo, op: PortOp },

    #[error("Cannot {op} frame on {port}")]
    InvalidDirection { port: PortInfo, op: PortOp },

    #[error("{port} is already connected to {peer}")]
    AlreadyConnected { port: PortInfo, peer: PortInfo },

    #[error("Queue of {port} is full ({capacity} frames)")]
    QueueFull { port: PortInfo, capacity: usize },

    #[error("No frame available to pull on {port}")]
    NoFrame { port: PortInfo },

    #[error("Frame format mismatch on {op} to {port}: expected '{expected}', got '{actual}'")]
    FormatMismatch {
        port: PortInfo,
        op: PortOp,
        expected: FrameFormat,
        actual: FrameFormat,
    },
}

impl PortError {
    /// The port that rejected the operation.
    pub fn port(&self) -> &PortInfo {
        match self {
            PortError::UnconnectedPush { port }
            | PortError::UnconnectedSet { port }
            | PortError::PortNotOpen { port, .. }
            | PortError::InvalidDirection { port, .. }
            | PortError::AlreadyConnected { port, .. }
            | PortError::QueueFull { port, .. }
            | PortError::NoFrame { port }
            | PortError::FormatMismatch { port, .. } => port,
        }
    }

    /// The operation that failed.
    pub fn op(&self) -> PortOp {
        match self {
            PortError::UnconnectedPush { .. } | PortError::QueueFull { .. } => PortOp::Push,
            PortError::UnconnectedSet { .. } => PortOp::Set,
            PortError::PortNotOpen { op, .. }
            | PortError::InvalidDirection { op, .. }
            | PortError::FormatMismatch { op, .. } => *op,
            PortError::AlreadyConnected { .. } => PortOp::Connect,
            PortError::NoFrame { .. } => PortOp::Pull,
        }
    }
}

pub type PortResult<T> = std::result::Result<T, PortError>;

/// Errors raised while wiring, validating or running a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown filter {0}")]
    UnknownFilter(FilterId),

    #[error("A filter named '{name}' already exists ({existing})")]
    DuplicateFilter { name: String, existing: FilterId },

    #[error("Filter '{filter}' has no {direction} port named '{port}'")]
    UnknownPort {
        filter: String,
        port: String,
        direction: PortDirection,
    },

    #[error("Unknown or already removed connection {0}")]
    UnknownConnection(ConnectionId),

    #[error("Blocking {port} is not connected")]
    UnconnectedInput { port: PortInfo },

    #[error("Cycle detected in filter graph")]
    CycleDetected,

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("Filter '{filter}' failed: {source}")]
    Filter {
        filter: String,
        #[source]
        source: Box<GraphError>,
    },
}

impl GraphError {
    /// Attribute this error to a filter, unless it already is.
    pub fn in_filter(self, filter: impl Into<String>) -> Self {
        match self {
            GraphError::Filter { .. } => self,
            other => GraphError::Filter {
                filter: filter.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying port error, looking through filter attribution.
    pub fn as_port_error(&self) -> Option<&PortError> {
        match self {
            GraphError::Port(e) => Some(e),
            GraphError::Filter { source, .. } => source.as_port_error(),
            _ => None,
        }
    }
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
