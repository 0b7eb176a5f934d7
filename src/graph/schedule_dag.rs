use super::GraphError;
use crate::task::{DependencyType, Task};
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Edge payload: precedence semantics plus lag in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub kind: DependencyType,
    pub lag: f64,
}

/// Id-indexed arena over a task slice.
///
/// Node weights are positions in the slice the DAG was built from, and nodes
/// are added in slice order, so `NodeIndex::index()` equals that position.
pub struct ScheduleDag {
    pub graph: DiGraph<usize, Link>,
    pub id_to_index: HashMap<String, NodeIndex>,
    pub ids: Vec<String>,
    pub durations: Vec<f64>,
}

impl ScheduleDag {
    /// Builds the edge set from the union of successor and predecessor lists.
    ///
    /// Edges are unique per `(pred, succ, type)`. Successor-side declarations
    /// are inserted first, predecessor-side ones second, and a repeated
    /// declaration overwrites the lag of the earlier one.
    pub fn build(tasks: &[Task]) -> Result<Self, GraphError> {
        let mut graph: DiGraph<usize, Link> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());
        let mut ids = Vec::with_capacity(tasks.len());
        let mut durations = Vec::with_capacity(tasks.len());

        // Add nodes first
        for (position, task) in tasks.iter().enumerate() {
            let node_ix = graph.add_node(position);
            if id_to_index.insert(task.id.clone(), node_ix).is_some() {
                return Err(GraphError::DuplicateTask(task.id.clone()));
            }
            ids.push(task.id.clone());
            durations.push(task.duration);
        }

        let lookup = |owner: &Task, reference: &str| -> Result<NodeIndex, GraphError> {
            id_to_index
                .get(reference)
                .copied()
                .ok_or_else(|| GraphError::UnknownTask {
                    task: owner.id.clone(),
                    reference: reference.to_string(),
                })
        };

        let mut edge_keys: HashMap<(NodeIndex, NodeIndex, DependencyType), EdgeIndex> =
            HashMap::new();
        let mut declared: Vec<(NodeIndex, NodeIndex, Link)> = Vec::new();

        for (position, task) in tasks.iter().enumerate() {
            let here = NodeIndex::new(position);
            for dep in &task.successors {
                let succ = lookup(task, &dep.task_id)?;
                declared.push((here, succ, Link { kind: dep.kind, lag: dep.lag as f64 }));
            }
        }
        for (position, task) in tasks.iter().enumerate() {
            let here = NodeIndex::new(position);
            for dep in &task.predecessors {
                let pred = lookup(task, &dep.task_id)?;
                declared.push((pred, here, Link { kind: dep.kind, lag: dep.lag as f64 }));
            }
        }

        for (from, to, link) in declared {
            match edge_keys.get(&(from, to, link.kind)) {
                Some(&edge_ix) => graph[edge_ix] = link,
                None => {
                    let edge_ix = graph.add_edge(from, to, link);
                    edge_keys.insert((from, to, link.kind), edge_ix);
                }
            }
        }

        Ok(Self {
            graph,
            id_to_index,
            ids,
            durations,
        })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn id(&self, node: NodeIndex) -> &str {
        &self.ids[node.index()]
    }

    pub fn duration(&self, node: NodeIndex) -> f64 {
        self.durations[node.index()]
    }

    /// Outgoing edges in declaration order.
    pub fn successors(&self, node: NodeIndex) -> Vec<(NodeIndex, Link)> {
        self.links(node, Direction::Outgoing)
    }

    /// Incoming edges in declaration order.
    pub fn predecessors(&self, node: NodeIndex) -> Vec<(NodeIndex, Link)> {
        self.links(node, Direction::Incoming)
    }

    pub fn has_predecessors(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
            .is_some()
    }

    pub fn has_successors(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
            .is_some()
    }

    fn links(&self, node: NodeIndex, direction: Direction) -> Vec<(NodeIndex, Link)> {
        // petgraph walks adjacency lists newest-first
        let mut edges: Vec<(EdgeIndex, NodeIndex, Link)> = self
            .graph
            .edges_directed(node, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other, *edge.weight())
            })
            .collect();
        edges.sort_by_key(|(edge_ix, _, _)| edge_ix.index());
        edges
            .into_iter()
            .map(|(_, other, link)| (other, link))
            .collect()
    }
}
