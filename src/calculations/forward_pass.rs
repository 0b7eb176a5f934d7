use super::EarlyDates;
use crate::graph::{Link, ScheduleDag};
use crate::task::DependencyType;
use petgraph::graph::NodeIndex;

/// Lower bound a single predecessor edge places on the successor's ES.
///
/// FF and SF bound the successor's finish, so they are shifted back by the
/// successor's own duration and may go negative.
pub fn start_constraint(link: &Link, pred: &EarlyDates, succ_duration: f64) -> f64 {
    match link.kind {
        DependencyType::FinishToStart => pred.ef + link.lag,
        DependencyType::StartToStart => pred.es + link.lag,
        DependencyType::FinishToFinish => pred.ef + link.lag - succ_duration,
        DependencyType::StartToFinish => pred.es + link.lag - succ_duration,
    }
}

pub struct ForwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Computes ES/EF for every node. `order` must be a complete topological
    /// order of the DAG; results are indexed by `NodeIndex::index()`.
    pub fn execute(&self, order: &[NodeIndex]) -> Vec<EarlyDates> {
        debug_assert_eq!(order.len(), self.dag.len());
        let mut early = vec![EarlyDates::default(); self.dag.len()];

        for &node in order {
            let duration = self.dag.duration(node);
            let predecessors = self.dag.predecessors(node);

            let (es, is_start) = if predecessors.is_empty() {
                (0.0, true)
            } else {
                // Project start clamps the max of all raw constraints.
                let es = predecessors
                    .iter()
                    .map(|(pred, link)| start_constraint(link, &early[pred.index()], duration))
                    .fold(0.0_f64, f64::max);
                (es, false)
            };

            early[node.index()] = EarlyDates {
                es,
                ef: es + duration,
                is_start,
            };
        }

        early
    }
}
