//! Built-in filters.

pub mod channel_sink;
pub mod counter_source;
pub mod passthrough;

pub use channel_sink::ChannelSink;
pub use counter_source::{CounterSource, COUNTER_FORMAT};
pub use passthrough::Passthrough;
