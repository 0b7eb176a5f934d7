use thiserror::Error;

pub mod cycle;
pub mod schedule_dag;
pub mod topology;

pub use cycle::{find_cycle, has_cycle};
pub use schedule_dag::{Link, ScheduleDag};
pub use topology::topological_order;

/// Structural problems found while turning tasks into a graph.
///
/// The orchestrator validates input first, so these only surface when the
/// graph helpers are called directly on unchecked data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("duplicate task id \"{0}\"")]
    DuplicateTask(String),
    #[error("task \"{task}\" references unknown task \"{reference}\"")]
    UnknownTask { task: String, reference: String },
    #[error("circular dependency among tasks: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}
