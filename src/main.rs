//! framewire demo runner
//!
//! Builds a small `source -> passthrough -> sink` graph, runs it to
//! completion and prints the run statistics and final graph snapshot as
//! JSON. An optional first argument names a TOML configuration file.

use anyhow::Context;
use framewire::{
    config::RuntimeConfig,
    graph::{
        filters::{ChannelSink, CounterSource, Passthrough},
        FilterGraph, SequentialRunner,
    },
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_FRAME_COUNT: u64 = 16;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => RuntimeConfig::default(),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting framewire demo");

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut graph = FilterGraph::with_settings(config.ports.clone());
    let source = graph.add_filter(Box::new(
        CounterSource::new("source", DEMO_FRAME_COUNT).with_interval(Duration::from_millis(10)),
    ))?;
    let pass = graph.add_filter(Box::new(Passthrough::new("pass")))?;
    let sink = graph.add_filter(Box::new(ChannelSink::new("sink", tx)))?;
    graph.connect(source, "out", pass, "in")?;
    graph.connect(pass, "out", sink, "in")?;

    let runner = SequentialRunner::new(config.runner.clone());
    let stats = runner.run(&mut graph).context("Demo run failed")?;

    let received: Vec<u64> = rx
        .try_iter()
        .filter_map(|frame| frame.payload::<u64>().copied())
        .collect();
    tracing::info!("Sink received {} frames", received.len());

    println!("{}", serde_json::to_string_pretty(&stats)?);
    println!("{}", graph.snapshot().to_json()?);

    graph.teardown();
    Ok(())
}
