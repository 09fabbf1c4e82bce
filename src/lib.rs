//! # framewire: frame handoff between filter ports
//!
//! The port layer of a filter graph runtime. Filters exchange `Frame`s
//! through typed ports: an `OutputPort` forwards every frame straight into
//! the `InputPort` it is connected to, and the input queues it until the
//! owning filter pulls it.
//!
//! ## Architecture
//!
//! - **Ports**: the `Port` trait, `OutputPort`, `InputPort` and the shared
//!   `SourceLink` state behind every output
//! - **Graph**: `FilterGraph` owns filters and their connections
//! - **Runner**: `SequentialRunner` drives a graph until every filter is done
//! - **Config**: TOML runtime settings (queue capacity, step limit, logging)
//!
//! ## Example
//!
//! ```ignore
//! use framewire::graph::{FilterGraph, SequentialRunner};
//! use framewire::graph::filters::{ChannelSink, CounterSource};
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let mut graph = FilterGraph::new();
//! let source = graph.add_filter(Box::new(CounterSource::new("source", 10)))?;
//! let sink = graph.add_filter(Box::new(ChannelSink::new("sink", tx)))?;
//! graph.connect(source, "out", sink, "in")?;
//!
//! let stats = SequentialRunner::default().run(&mut graph)?;
//! assert_eq!(rx.try_iter().count(), 10);
//! ```

pub mod config;
pub mod error;
pub mod graph;

// Re-export commonly used types
pub use config::RuntimeConfig;
pub use error::{FramewireError, Result, ResultExt};
pub use graph::{
    Filter, FilterGraph, FilterPorts, Frame, FrameFormat, GraphError, InputPort, OutputPort, Port,
    PortError, ProcessStatus, SequentialRunner,
};
