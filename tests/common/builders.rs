//! Test graph builders

use framewire::config::PortSettings;
use framewire::graph::filters::{ChannelSink, CounterSource, Passthrough};
use framewire::graph::{FilterGraph, FilterId, Frame};
use crossbeam_channel::Receiver;

/// A `source -> pass x N -> sink` graph and the receiving end of its sink
pub struct LinearGraph {
    pub graph: FilterGraph,
    pub source: FilterId,
    pub sink: FilterId,
    pub received: Receiver<Frame>,
}

/// Builder for linear test graphs
pub struct LinearGraphBuilder {
    frames: u64,
    stages: usize,
    queue_capacity: Option<usize>,
}

impl LinearGraphBuilder {
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            stages: 0,
            queue_capacity: None,
        }
    }

    /// Number of passthrough filters between source and sink
    pub fn stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> LinearGraph {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut graph = match self.queue_capacity {
            Some(default_queue_capacity) => FilterGraph::with_settings(PortSettings {
                default_queue_capacity,
            }),
            None => FilterGraph::new(),
        };

        let source = graph
            .add_filter(Box::new(CounterSource::new("source", self.frames)))
            .expect("filter names are unique");
        let mut previous = source;
        for i in 0..self.stages {
            let stage = graph
                .add_filter(Box::new(Passthrough::new(format!("pass{}", i))))
                .expect("filter names are unique");
            graph
                .connect(previous, "out", stage, "in")
                .expect("linear stages connect");
            previous = stage;
        }
        let sink = graph
            .add_filter(Box::new(ChannelSink::new("sink", tx)))
            .expect("filter names are unique");
        graph
            .connect(previous, "out", sink, "in")
            .expect("sink connects");

        LinearGraph {
            graph,
            source,
            sink,
            received: rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_graph_builder() {
        let built = LinearGraphBuilder::new(3).stages(2).build();
        assert_eq!(built.graph.len(), 4);
        assert_eq!(built.graph.connections().count(), 3);
    }
}
