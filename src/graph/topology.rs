use super::{GraphError, ScheduleDag};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use std::collections::VecDeque;

/// Kahn's algorithm with a FIFO queue.
///
/// Zero in-degree tasks are seeded in input order and successors are released
/// in declaration order, so the result is stable for a given input.
pub fn topological_order(dag: &ScheduleDag) -> Result<Vec<NodeIndex>, GraphError> {
    let mut in_degree: Vec<usize> = dag
        .graph
        .node_indices()
        .map(|node| dag.graph.edges_directed(node, Direction::Incoming).count())
        .collect();

    let mut queue: VecDeque<NodeIndex> = dag
        .graph
        .node_indices()
        .filter(|node| in_degree[node.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(dag.len());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for (succ, _) in dag.successors(node) {
            let remaining = &mut in_degree[succ.index()];
            *remaining -= 1;
            if *remaining == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() != dag.len() {
        let stuck = dag
            .graph
            .node_indices()
            .filter(|node| in_degree[node.index()] > 0)
            .map(|node| dag.id(node).to_string())
            .collect();
        return Err(GraphError::Cycle(stuck));
    }

    Ok(order)
}
