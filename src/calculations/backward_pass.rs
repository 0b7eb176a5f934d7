use super::{EarlyDates, LateDates};
use crate::graph::{Link, ScheduleDag};
use crate::task::DependencyType;
use petgraph::graph::NodeIndex;
use tracing::trace;

/// Upper bound a single successor edge places on the predecessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LateBound {
    Finish(f64),
    Start(f64),
}

pub fn late_bound(link: &Link, succ: &LateDates) -> LateBound {
    match link.kind {
        DependencyType::FinishToStart => LateBound::Finish(succ.ls - link.lag),
        DependencyType::StartToStart => LateBound::Start(succ.ls - link.lag),
        DependencyType::FinishToFinish => LateBound::Finish(succ.lf - link.lag),
        DependencyType::StartToFinish => LateBound::Start(succ.lf - link.lag),
    }
}

/// Picks `(ls, lf)` with `lf = ls + duration` that respects both bound classes.
///
/// When both exist the start-driven pair wins unless it would overrun the
/// finish bound.
pub fn resolve_late_window(
    min_start: Option<f64>,
    min_finish: Option<f64>,
    duration: f64,
    horizon: f64,
) -> (f64, f64) {
    match (min_start, min_finish) {
        (Some(ls), Some(lf)) => {
            let lf_from_ls = ls + duration;
            if lf_from_ls <= lf {
                (ls, lf_from_ls)
            } else {
                (lf - duration, lf)
            }
        }
        (Some(ls), None) => (ls, ls + duration),
        (None, Some(lf)) => (lf - duration, lf),
        (None, None) => (horizon - duration, horizon),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackwardPassResult {
    /// Latest early finish among tasks without successors.
    pub horizon: f64,
    pub late: Vec<LateDates>,
}

pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag,
    early: &'a [EarlyDates],
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag, early: &'a [EarlyDates]) -> Self {
        Self { dag, early }
    }

    pub fn execute(&self, order: &[NodeIndex]) -> BackwardPassResult {
        debug_assert_eq!(order.len(), self.dag.len());

        let horizon = self
            .dag
            .graph
            .node_indices()
            .filter(|node| !self.dag.has_successors(*node))
            .map(|node| self.early[node.index()].ef)
            .fold(0.0_f64, f64::max);

        let mut late = vec![LateDates::default(); self.dag.len()];

        // Reverse topological order
        for &node in order.iter().rev() {
            let duration = self.dag.duration(node);
            let successors = self.dag.successors(node);

            if successors.is_empty() {
                late[node.index()] = LateDates {
                    ls: horizon - duration,
                    lf: horizon,
                    is_end: true,
                };
                continue;
            }

            let mut min_start: Option<f64> = None;
            let mut min_finish: Option<f64> = None;
            for (succ, link) in &successors {
                match late_bound(link, &late[succ.index()]) {
                    LateBound::Start(bound) => {
                        min_start = Some(min_start.map_or(bound, |cur| cur.min(bound)));
                    }
                    LateBound::Finish(bound) => {
                        min_finish = Some(min_finish.map_or(bound, |cur| cur.min(bound)));
                    }
                }
            }

            let (ls, lf) = resolve_late_window(min_start, min_finish, duration, horizon);
            trace!(task = self.dag.id(node), ls, lf, "late window resolved");
            late[node.index()] = LateDates {
                ls,
                lf,
                is_end: false,
            };
        }

        BackwardPassResult { horizon, late }
    }
}
