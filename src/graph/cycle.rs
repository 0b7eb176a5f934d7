use super::ScheduleDag;
use petgraph::graph::NodeIndex;

/// DFS node state for cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the current DFS path.
    OnPath,
    Explored,
}

/// Iterative depth-first search over successor edges.
///
/// Returns the offending ids when a back-edge is found, starting and ending
/// with the re-entered task (`["a", "b", "a"]`). Every unvisited node seeds a
/// new search so disconnected subgraphs are covered.
pub fn find_cycle(dag: &ScheduleDag) -> Option<Vec<String>> {
    let adjacency: Vec<Vec<NodeIndex>> = dag
        .graph
        .node_indices()
        .map(|node| dag.successors(node).into_iter().map(|(succ, _)| succ).collect())
        .collect();
    let mut marks = vec![Mark::Unvisited; adjacency.len()];

    for start in dag.graph.node_indices() {
        if marks[start.index()] != Mark::Unvisited {
            continue;
        }

        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        marks[start.index()] = Mark::OnPath;

        while let Some((node, cursor)) = stack.pop() {
            let next = &adjacency[node.index()];
            if cursor >= next.len() {
                marks[node.index()] = Mark::Explored;
                continue;
            }

            stack.push((node, cursor + 1));
            let succ = next[cursor];

            match marks[succ.index()] {
                Mark::Unvisited => {
                    marks[succ.index()] = Mark::OnPath;
                    stack.push((succ, 0));
                }
                Mark::OnPath => {
                    // The stack holds exactly the current path, root first.
                    let entry = stack
                        .iter()
                        .position(|(on_path, _)| *on_path == succ)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> = stack[entry..]
                        .iter()
                        .map(|(on_path, _)| dag.id(*on_path).to_string())
                        .collect();
                    cycle.push(dag.id(succ).to_string());
                    return Some(cycle);
                }
                Mark::Explored => {}
            }
        }
    }

    None
}

pub fn has_cycle(dag: &ScheduleDag) -> bool {
    find_cycle(dag).is_some()
}
