pub mod calculations;
pub mod config;
pub mod dependencies;
pub mod graph;
pub mod ids;
pub mod interchange;
pub mod metadata;
pub mod resource;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use config::{ConfigError, EngineConfig};
pub use dependencies::build_task_dependencies;
pub use ids::{IdIssuer, SequentialIdIssuer, UuidIdIssuer};
pub use interchange::{InterchangeError, InterchangeResult, ProjectDocument};
pub use metadata::ProjectMetadata;
pub use resource::{Resource, ResourceKind};
pub use schedule::{CpmResult, calculate_cpm, calculate_cpm_batch, calculate_cpm_with_config};
pub use task::{
    Dependency, DependencyType, PlannedTask, ScheduledTask, Task, create_task_from_input,
};
pub use task_validation::validate_tasks;
