//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use framewire::graph::{Frame, FrameFormat, InputPort, OutputPort, PortDescriptor};
use std::sync::Arc;

pub const TEST_FORMAT: FrameFormat = FrameFormat::from_static("test/u64");

/// Create a frame carrying `n`
pub fn frame(n: u64) -> Frame {
    Frame::new(TEST_FORMAT, n)
}

/// Read back the value carried by a test frame
pub fn value(frame: &Frame) -> u64 {
    *frame
        .payload::<u64>()
        .expect("test frames carry a u64 payload")
}

/// A connected, still closed output/input pair owned by filters "up" and "down"
pub fn connected_pair() -> (OutputPort, Arc<InputPort>) {
    let output = OutputPort::new("up", &PortDescriptor::output("out"));
    let input = Arc::new(InputPort::new("down", &PortDescriptor::input("in")));
    output
        .connect_to(&input)
        .expect("fresh ports connect without error");
    (output, input)
}

/// Same as [`connected_pair`] but with an explicit input queue capacity
pub fn connected_pair_with_capacity(capacity: usize) -> (OutputPort, Arc<InputPort>) {
    let output = OutputPort::new("up", &PortDescriptor::output("out"));
    let input = Arc::new(InputPort::new(
        "down",
        &PortDescriptor::input("in").with_capacity(capacity),
    ));
    output
        .connect_to(&input)
        .expect("fresh ports connect without error");
    (output, input)
}
