//! Filter graph: ports, frames and the connections between them.
//!
//! Frames flow from a filter's `OutputPort` straight into the connected
//! filter's `InputPort`, which is the only place they wait.
//!
//! # Architecture
//!
//! ```text
//! [CounterSource] out ──► in [Passthrough] out ──► in [ChannelSink]
//!                 (no buffer)  (queue)               (queue)
//! ```
//!
//! # Design
//!
//! - **One buffer per connection**: `OutputPort` forwards, `InputPort` queues.
//! - **Weak targets**: outputs hold `Weak<InputPort>`; the graph owns filters
//!   and filters own ports, so teardown never leaves a dangling peer.
//! - **Structured failures**: misuse returns a `PortError` naming the
//!   filter, the port and the operation.
//! - **Scheduler-agnostic**: ports are `Send + Sync` and never block;
//!   `SequentialRunner` is one driver among possible others.

pub mod error;
pub mod filter;
pub mod filter_graph;
pub mod filters;
pub mod frame;
pub mod id;
pub mod input_port;
pub mod output_port;
pub mod port;
pub mod runner;
pub mod snapshot;
pub mod source_port;

pub use error::{GraphError, GraphResult, PortError, PortResult};
pub use filter::{Filter, FilterPorts, ProcessStatus};
pub use filter_graph::{Connection, FilterGraph};
pub use frame::{Frame, FrameFormat};
pub use id::{ConnectionId, FilterId};
pub use input_port::InputPort;
pub use output_port::OutputPort;
pub use port::{Port, PortDescriptor, PortDirection, PortInfo, PortOp, PortState};
pub use runner::{RunStats, SequentialRunner, StopReason};
pub use snapshot::{ConnectionSnapshot, FilterSnapshot, GraphSnapshot, PortSnapshot};
pub use source_port::SourceLink;
