//! Sequential runner: drives a filter graph to completion on the calling
//! thread.
//!
//! Each step visits the unfinished filters in topological order:
//! 1. A filter with a port demanding closure is finished (outputs closed,
//!    `on_close` called).
//! 2. A filter whose ports are all ready gets one `process` call.
//! 3. Everything else is skipped until a later step.
//!
//! The run ends when every filter has finished, when a full step makes no
//! progress, or when the configured step limit is hit.

use crate::config::RunnerSettings;
use crate::graph::error::GraphResult;
use crate::graph::filter::{Filter, ProcessStatus};
use crate::graph::filter_graph::FilterGraph;
use crate::graph::id::FilterId;
use serde::Serialize;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every filter finished.
    Completed,
    /// No filter could run or finish during a whole step.
    Stalled,
    /// `max_steps` was reached.
    StepLimit,
}

/// Counters collected over one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub steps: u64,
    pub process_calls: u64,
    pub finished_filters: usize,
    pub stop_reason: StopReason,
}

pub struct SequentialRunner {
    settings: RunnerSettings,
}

impl SequentialRunner {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { settings }
    }

    /// Validate, open and drive `graph`, then close every port.
    ///
    /// The first error raised by a filter aborts the run and is returned
    /// attributed to that filter.
    pub fn run(&self, graph: &mut FilterGraph) -> GraphResult<RunStats> {
        graph.validate()?;
        let order = graph.topological_order()?;
        let mut finished = vec![false; graph.len()];

        tracing::info!("Starting run over {} filters", order.len());
        graph.open_all();

        let result = match Self::open_filters(graph, &order) {
            Ok(()) => self.drive(graph, &order, &mut finished),
            Err(e) => Err(e),
        };

        for (filter, done) in graph.filters_mut().iter_mut().zip(&finished) {
            if !done {
                filter.on_close();
            }
        }
        graph.close_all();

        match &result {
            Ok(stats) => tracing::info!(
                "Run stopped ({:?}) after {} steps, {} process calls",
                stats.stop_reason,
                stats.steps,
                stats.process_calls
            ),
            Err(e) => tracing::warn!("Run aborted: {}", e),
        }
        result
    }

    fn open_filters(graph: &mut FilterGraph, order: &[FilterId]) -> GraphResult<()> {
        for &id in order {
            let filter = graph.filter_mut(id)?;
            filter.on_open().map_err(|e| e.in_filter(filter.name()))?;
        }
        Ok(())
    }

    fn drive(
        &self,
        graph: &mut FilterGraph,
        order: &[FilterId],
        finished: &mut [bool],
    ) -> GraphResult<RunStats> {
        let filters = graph.filters_mut();
        let mut steps = 0u64;
        let mut process_calls = 0u64;

        let stop_reason = loop {
            if finished.iter().all(|&done| done) {
                break StopReason::Completed;
            }
            if steps >= self.settings.max_steps {
                tracing::warn!("Run hit the step limit ({})", self.settings.max_steps);
                break StopReason::StepLimit;
            }
            steps += 1;

            let mut progressed = false;
            for &id in order {
                let idx = id.index();
                if finished[idx] {
                    continue;
                }
                let filter = &mut filters[idx];

                if filter.ports().must_close() {
                    Self::finish(filter.as_mut());
                    finished[idx] = true;
                    progressed = true;
                    continue;
                }
                if !filter.ports().is_ready() {
                    continue;
                }

                process_calls += 1;
                progressed = true;
                match filter.process() {
                    Ok(ProcessStatus::Continue) => {}
                    Ok(ProcessStatus::Finished) => {
                        Self::finish(filter.as_mut());
                        finished[idx] = true;
                    }
                    Err(e) => {
                        tracing::warn!("Filter '{}' failed: {}", filter.name(), e);
                        return Err(e.in_filter(filter.name()));
                    }
                }
            }

            if !progressed {
                tracing::warn!("Run stalled after {} steps", steps);
                break StopReason::Stalled;
            }
        };

        Ok(RunStats {
            steps,
            process_calls,
            finished_filters: finished.iter().filter(|&&done| done).count(),
            stop_reason,
        })
    }

    fn finish(filter: &mut dyn Filter) {
        filter.ports().close_outputs();
        filter.on_close();
        tracing::debug!("Filter '{}' finished", filter.name());
    }
}

impl Default for SequentialRunner {
    fn default() -> Self {
        Self::new(RunnerSettings::default())
    }
}
