use super::{EarlyDates, FloatValues, LateDates};
use crate::graph::{Link, ScheduleDag};
use crate::task::DependencyType;

/// Delay the predecessor can absorb before it pushes this successor's early dates.
pub fn edge_slack(link: &Link, pred: &EarlyDates, succ: &EarlyDates) -> f64 {
    match link.kind {
        DependencyType::FinishToStart => succ.es - link.lag - pred.ef,
        DependencyType::StartToStart => succ.es - link.lag - pred.es,
        DependencyType::FinishToFinish => succ.ef - link.lag - pred.ef,
        DependencyType::StartToFinish => succ.ef - link.lag - pred.es,
    }
}

pub struct FloatResolver<'a> {
    dag: &'a ScheduleDag,
    early: &'a [EarlyDates],
    late: &'a [LateDates],
    critical_tolerance: f64,
}

impl<'a> FloatResolver<'a> {
    pub fn new(
        dag: &'a ScheduleDag,
        early: &'a [EarlyDates],
        late: &'a [LateDates],
        critical_tolerance: f64,
    ) -> Self {
        Self {
            dag,
            early,
            late,
            critical_tolerance,
        }
    }

    pub fn execute(&self) -> Vec<FloatValues> {
        self.dag
            .graph
            .node_indices()
            .map(|node| {
                let early = &self.early[node.index()];
                let tf = self.late[node.index()].ls - early.es;

                let ff = self
                    .dag
                    .successors(node)
                    .iter()
                    .map(|(succ, link)| edge_slack(link, early, &self.early[succ.index()]))
                    .reduce(f64::min)
                    .map_or(tf, |slack| slack.max(0.0));

                FloatValues {
                    tf,
                    ff,
                    is_critical: tf.abs() < self.critical_tolerance,
                }
            })
            .collect()
    }
}
