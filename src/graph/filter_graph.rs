//! Graph-owned filter table and connection wiring.
//!
//! The graph owns every filter, and through them every port. Output ports
//! only hold weak handles to their targets, so `teardown` (or dropping the
//! graph) leaves no port keeping another alive.

use crate::config::PortSettings;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::filter::Filter;
use crate::graph::id::{ConnectionId, FilterId};
use crate::graph::port::{Port, PortDirection};
use crate::graph::snapshot::{ConnectionSnapshot, FilterSnapshot, GraphSnapshot, PortSnapshot};
use std::collections::VecDeque;

/// A live connection between an output and an input port.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_filter: FilterId,
    pub output: String,
    pub to_filter: FilterId,
    pub input: String,
}

pub struct FilterGraph {
    filters: Vec<Box<dyn Filter>>,
    /// Removed connections leave a `None` so ids stay stable.
    connections: Vec<Option<Connection>>,
    settings: PortSettings,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::with_settings(PortSettings::default())
    }

    pub fn with_settings(settings: PortSettings) -> Self {
        Self {
            filters: Vec::new(),
            connections: Vec::new(),
            settings,
        }
    }

    // ── Filters ──

    /// Add a filter to the graph. Returns its FilterId.
    ///
    /// Filter names identify ports in every diagnostic, so they must be
    /// unique within a graph.
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) -> GraphResult<FilterId> {
        if let Some(existing) = self.find(filter.name()) {
            return Err(GraphError::DuplicateFilter {
                name: filter.name().to_string(),
                existing,
            });
        }
        for input in filter.ports().inputs() {
            input.apply_default_capacity(self.settings.default_queue_capacity);
        }
        let id = FilterId(self.filters.len() as u32);
        tracing::debug!("Added filter '{}' as {}", filter.name(), id);
        self.filters.push(filter);
        Ok(id)
    }

    pub fn filter(&self, id: FilterId) -> GraphResult<&dyn Filter> {
        self.filters
            .get(id.index())
            .map(|f| &**f)
            .ok_or(GraphError::UnknownFilter(id))
    }

    pub fn filter_mut(&mut self, id: FilterId) -> GraphResult<&mut dyn Filter> {
        match self.filters.get_mut(id.index()) {
            Some(filter) => Ok(&mut **filter),
            None => Err(GraphError::UnknownFilter(id)),
        }
    }

    /// Look up a filter by name.
    pub fn find(&self, name: &str) -> Option<FilterId> {
        self.filters
            .iter()
            .position(|f| f.name() == name)
            .map(|i| FilterId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filter_ids(&self) -> impl Iterator<Item = FilterId> {
        (0..self.filters.len() as u32).map(FilterId)
    }

    // ── Wiring ──

    /// Connect output `output` of `from` to input `input` of `to`.
    pub fn connect(
        &mut self,
        from: FilterId,
        output: &str,
        to: FilterId,
        input: &str,
    ) -> GraphResult<ConnectionId> {
        let source = self.filter(from)?.ports().output(output)?;
        let target = self.filter(to)?.ports().input(input)?;
        source.connect_to(target)?;

        let id = ConnectionId(self.connections.len() as u32);
        self.connections.push(Some(Connection {
            id,
            from_filter: from,
            output: output.to_string(),
            to_filter: to,
            input: input.to_string(),
        }));
        Ok(id)
    }

    /// Remove a connection, dropping any frames still queued on it.
    pub fn disconnect(&mut self, id: ConnectionId) -> GraphResult<()> {
        let connection = self
            .connections
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::UnknownConnection(id))?;

        self.filter(connection.from_filter)?
            .ports()
            .output(&connection.output)?
            .disconnect();
        Ok(())
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().flatten()
    }

    // ── Validation ──

    /// Check that every blocking input is connected and the graph is acyclic.
    pub fn validate(&self) -> GraphResult<()> {
        for filter in &self.filters {
            for input in filter.ports().inputs() {
                if input.is_blocking() && !input.is_connected() {
                    return Err(GraphError::UnconnectedInput {
                        port: input.info().clone(),
                    });
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Filters ordered so that producers come before their consumers
    /// (Kahn's algorithm, ties broken by insertion order).
    pub fn topological_order(&self) -> GraphResult<Vec<FilterId>> {
        let n = self.filters.len();
        let mut in_degree = vec![0u32; n];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

        for connection in self.connections() {
            let from = connection.from_filter.index();
            let to = connection.to_filter.index();
            adj[from].push(to);
            in_degree[to] += 1;
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(filter) = queue.pop_front() {
            order.push(FilterId(filter as u32));
            for &next in &adj[filter] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != n {
            tracing::warn!(
                "Filter graph has a cycle! Only {} of {} filters can be ordered.",
                order.len(),
                n
            );
            return Err(GraphError::CycleDetected);
        }

        Ok(order)
    }

    // ── Lifecycle ──

    pub fn open_all(&self) {
        for filter in &self.filters {
            filter.ports().open_all();
        }
    }

    pub fn close_all(&self) {
        for filter in &self.filters {
            filter.ports().close_all();
        }
    }

    /// Flush every buffered frame in the graph. Topology is unchanged.
    pub fn clear_all(&self) {
        for filter in &self.filters {
            filter.ports().clear_all();
        }
    }

    /// Close and flush every port, then remove every connection.
    pub fn teardown(&mut self) {
        self.close_all();
        self.clear_all();
        for filter in &self.filters {
            for output in filter.ports().outputs() {
                output.disconnect();
            }
        }
        let removed = self.connections.iter_mut().filter_map(Option::take).count();
        tracing::debug!("Tore down filter graph ({} connections removed)", removed);
    }

    pub(crate) fn filters_mut(&mut self) -> &mut [Box<dyn Filter>] {
        &mut self.filters
    }

    // ── Introspection ──

    pub fn snapshot(&self) -> GraphSnapshot {
        let filters = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, filter)| FilterSnapshot {
                id: FilterId(i as u32),
                name: filter.name().to_string(),
                ports: filter
                    .ports()
                    .iter()
                    .map(|port| PortSnapshot {
                        name: port.info().name.clone(),
                        direction: port.direction(),
                        state: port.state(),
                        has_frame: port.has_frame(),
                    })
                    .collect(),
            })
            .collect();

        let connections = self
            .connections()
            .map(|c| ConnectionSnapshot {
                id: c.id,
                from_filter: c.from_filter,
                output: c.output.clone(),
                to_filter: c.to_filter,
                input: c.input.clone(),
            })
            .collect();

        GraphSnapshot {
            filters,
            connections,
        }
    }

    /// Count of ports in the given direction that are not connected.
    pub fn unconnected_ports(&self, direction: PortDirection) -> usize {
        self.filters
            .iter()
            .flat_map(|f| f.ports().iter())
            .filter(|p| p.direction() == direction && !p.is_connected())
            .count()
    }
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}
